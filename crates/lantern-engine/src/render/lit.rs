use glam::Vec3;

use crate::gl::{GlApi, TextureTarget, UniformLocation};
use crate::material::{MaterialSource, TextureRef};
use crate::mesh::AttributeLocations;

use super::error::{GraphicsStateError, ProgramError, RenderError, TargetMismatchError};
use super::item::{RenderItem, ViewTransforms};
use super::program::ShaderProgram;
use super::strategy::{DrawStrategy, StrategyPreference};

const VERTEX_SHADER: &str = include_str!("shaders/lit.vert");
const FRAGMENT_SHADER: &str = include_str!("shaders/lit.frag");

/// Material property names read by [`LitRenderer`].
pub const MAIN_TEXTURE: &str = "main_texture";
pub const COLOR: &str = "color";
pub const OPACITY: &str = "opacity";

// Texture unit the sampler reads from.
const TEXTURE_UNIT: u32 = 0;

/// Configuration for [`LitRenderer`].
#[derive(Debug, Clone)]
pub struct LitRendererConfig {
    /// Geometry path; resolved once against the context.
    pub strategy: StrategyPreference,

    /// Drain and log the context's error queue after each draw.
    ///
    /// Error queries can stall the pipeline on some drivers.
    pub check_errors: bool,
}

impl Default for LitRendererConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyPreference::Auto,
            check_errors: true,
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct LitUniforms {
    model_view: UniformLocation,
    model_view_inverse_transpose: UniformLocation,
    model_view_projection: UniformLocation,
    texture: UniformLocation,
    color: UniformLocation,
    opacity: UniformLocation,
}

/// Material values the lit pipeline needs, resolved and validated.
#[derive(Debug, Copy, Clone)]
struct LitMaterial {
    texture: TextureRef,
    color: Vec3,
    opacity: f32,
}

impl LitMaterial {
    fn resolve(material: &dyn MaterialSource) -> Result<Self, RenderError> {
        let texture = material.texture(MAIN_TEXTURE)?;
        let color = material.vec3(COLOR)?;
        let opacity = material.float(OPACITY)?;

        if texture.target() != TextureTarget::Texture2D {
            return Err(TargetMismatchError {
                expected: TextureTarget::Texture2D,
                found: texture.target(),
            }
            .into());
        }

        Ok(Self {
            texture,
            color,
            opacity,
        })
    }
}

/// Textured, lit renderer: one fixed point light, diffuse + ambient + specular.
///
/// Material contract (see [`MAIN_TEXTURE`], [`COLOR`], [`OPACITY`]):
/// - `main_texture`: 2D texture
/// - `color`: vec3 multiplier
/// - `opacity`: float multiplier (also scales alpha)
///
/// The geometry path ([`DrawStrategy`]) is chosen once at construction.
#[derive(Debug)]
pub struct LitRenderer {
    program: ShaderProgram,
    attributes: AttributeLocations,
    uniforms: LitUniforms,
    strategy: DrawStrategy,
    check_errors: bool,
}

impl LitRenderer {
    /// Builds the lit program and resolves every slot it uses.
    ///
    /// Fails without leaving a program behind if compilation, linking or any
    /// symbol lookup fails.
    pub fn new(gl: &dyn GlApi, config: LitRendererConfig) -> Result<Self, ProgramError> {
        Self::with_sources(gl, config, VERTEX_SHADER, FRAGMENT_SHADER)
    }

    fn with_sources(
        gl: &dyn GlApi,
        config: LitRendererConfig,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, ProgramError> {
        let mut program = ShaderProgram::create(gl, "lit", vertex_source, fragment_source)?;

        let slots = Self::locate_slots(gl, &mut program);
        let (attributes, uniforms) = match slots {
            Ok(slots) => slots,
            Err(e) => {
                program.destroy(gl);
                return Err(e);
            }
        };

        let strategy = DrawStrategy::select(gl, config.strategy);
        log::debug!("lit renderer ready ({strategy:?})");

        Ok(Self {
            program,
            attributes,
            uniforms,
            strategy,
            check_errors: config.check_errors,
        })
    }

    fn locate_slots(
        gl: &dyn GlApi,
        program: &mut ShaderProgram,
    ) -> Result<(AttributeLocations, LitUniforms), ProgramError> {
        let attributes = AttributeLocations {
            position: program.attribute(gl, "a_position")?,
            tex_coord: program.attribute(gl, "a_tex_coord")?,
            normal: program.attribute(gl, "a_normal")?,
        };
        let uniforms = LitUniforms {
            model_view: program.uniform(gl, "u_mv")?,
            model_view_inverse_transpose: program.uniform(gl, "u_mv_it")?,
            model_view_projection: program.uniform(gl, "u_mvp")?,
            texture: program.uniform(gl, "u_texture")?,
            color: program.uniform(gl, "u_color")?,
            opacity: program.uniform(gl, "u_opacity")?,
        };
        Ok((attributes, uniforms))
    }

    #[inline]
    pub fn strategy(&self) -> DrawStrategy {
        self.strategy
    }

    #[inline]
    pub fn attribute_locations(&self) -> AttributeLocations {
        self.attributes
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.program.is_destroyed()
    }

    /// Draws `item` with `transforms`.
    ///
    /// Material resolution and texture validation happen before any GPU call, so
    /// `Material`/`TargetMismatch` errors leave context state untouched and the
    /// caller can skip the item. Errors reported by the context after the draw
    /// are logged, not returned.
    pub fn render(
        &self,
        gl: &dyn GlApi,
        transforms: &ViewTransforms,
        item: RenderItem<'_>,
    ) -> Result<(), RenderError> {
        let material = LitMaterial::resolve(item.material)?;
        self.program
            .bind(gl)
            .map_err(|_| RenderError::Destroyed)?;

        gl.active_texture(TEXTURE_UNIT);
        gl.bind_texture(TextureTarget::Texture2D, Some(material.texture.handle()));
        gl.uniform_1i(self.uniforms.texture, TEXTURE_UNIT as i32);

        gl.uniform_matrix4(
            self.uniforms.model_view,
            false,
            &transforms.model_view.to_cols_array(),
        );
        gl.uniform_matrix4(
            self.uniforms.model_view_inverse_transpose,
            false,
            &transforms.model_view_inverse_transpose.to_cols_array(),
        );
        gl.uniform_matrix4(
            self.uniforms.model_view_projection,
            false,
            &transforms.model_view_projection.to_cols_array(),
        );

        gl.uniform_3f(self.uniforms.color, material.color.to_array());
        gl.uniform_1f(self.uniforms.opacity, material.opacity);

        let bound = self.strategy.bind(gl, item.geometry, self.attributes)?;
        self.strategy.draw(gl, item.geometry, bound);

        if self.check_errors {
            for err in GraphicsStateError::drain(gl, "LitRenderer::render") {
                log::warn!("{err}");
            }
        }

        Ok(())
    }

    /// Releases the program. Later calls are no-ops; later renders fail with
    /// [`RenderError::Destroyed`].
    pub fn destroy(&mut self, gl: &dyn GlApi) {
        self.program.destroy(gl);
    }
}
