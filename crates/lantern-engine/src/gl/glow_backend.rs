use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use glow::HasContext;

use super::api::GlApi;
use super::types::{
    AttribLocation, AttribSource, BufferHandle, BufferTarget, IndexFormat, IndexSource,
    PrimitiveTopology, ProgramHandle, ShaderHandle, ShaderStage, TextureHandle, TextureTarget,
    UniformLocation, VertexArrayHandle,
};

// Not exported by glow; value from OES_EGL_image_external.
const TEXTURE_EXTERNAL_OES: u32 = 0x8D65;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
enum StreamSlot {
    Attrib(u32),
    Index,
}

/// Failures of client-array streaming, surfaced through `get_error`.
///
/// A failed attribute upload leaves that attribute without data, so the next
/// client-array draw is skipped rather than issued against a stale or null
/// pointer.
#[derive(Debug, Default)]
struct StreamFaults {
    attribute_missing: Cell<bool>,
    errors: RefCell<VecDeque<u32>>,
}

impl StreamFaults {
    fn attribute_failed(&self) {
        self.attribute_missing.set(true);
        self.errors.borrow_mut().push_back(glow::OUT_OF_MEMORY);
    }

    fn index_failed(&self) {
        self.errors.borrow_mut().push_back(glow::OUT_OF_MEMORY);
    }

    /// Whether a client-array draw may run. Clears the attribute fault.
    fn take_draw_allowed(&self) -> bool {
        !self.attribute_missing.replace(false)
    }

    fn pop_error(&self) -> Option<u32> {
        self.errors.borrow_mut().pop_front()
    }
}

/// `GlApi` over a `glow::Context`.
///
/// glow has no client-side attribute/index pointers, so `AttribSource::Client` and
/// `IndexSource::Client` are streamed through scratch buffers owned by this type
/// (one per attribute location plus one for indices), re-uploaded on every use.
pub struct GlowContext {
    gl: glow::Context,
    vertex_arrays: bool,
    core_profile: bool,
    stream_buffers: RefCell<HashMap<StreamSlot, glow::NativeBuffer>>,
    faults: StreamFaults,
}

impl GlowContext {
    /// Wraps a loaded glow context and detects its capabilities.
    ///
    /// # Safety
    /// `gl` must be current on the calling thread, and must stay current on that
    /// thread for as long as the returned value (or anything rendered with it) is used.
    pub unsafe fn new(gl: glow::Context) -> Self {
        let version = gl.version();
        let vertex_arrays = version.major >= 3
            || gl.supported_extensions().contains("GL_ARB_vertex_array_object");

        // SAFETY: context is current per this function's contract.
        let core_profile = !version.is_embedded
            && (version.major, version.minor) >= (3, 2)
            && unsafe {
                (gl.get_parameter_i32(glow::CONTEXT_PROFILE_MASK)
                    & glow::CONTEXT_CORE_PROFILE_BIT as i32)
                    != 0
            };

        log::debug!(
            "gl context: {}.{} (es: {}, core: {}), vertex arrays: {}",
            version.major,
            version.minor,
            version.is_embedded,
            core_profile,
            vertex_arrays
        );

        Self {
            gl,
            vertex_arrays,
            core_profile,
            stream_buffers: RefCell::new(HashMap::new()),
            faults: StreamFaults::default(),
        }
    }

    /// Raw glow access for collaborators (texture upload, framebuffer setup).
    #[inline]
    pub fn raw(&self) -> &glow::Context {
        &self.gl
    }

    /// Uploads `data` into the scratch buffer for `slot`, leaving it bound to
    /// `target`. On error nothing is bound.
    fn stream(&self, slot: StreamSlot, target: u32, data: &[u8]) -> Result<(), String> {
        let mut buffers = self.stream_buffers.borrow_mut();
        let buffer = match buffers.get(&slot) {
            Some(b) => *b,
            None => {
                // SAFETY: context is current per `GlowContext::new`.
                let b = unsafe { self.gl.create_buffer() }?;
                buffers.insert(slot, b);
                b
            }
        };
        unsafe {
            self.gl.bind_buffer(target, Some(buffer));
            self.gl.buffer_data_u8_slice(target, data, glow::STREAM_DRAW);
        }
        Ok(())
    }
}

impl Drop for GlowContext {
    fn drop(&mut self) {
        for (_, buffer) in self.stream_buffers.get_mut().drain() {
            // SAFETY: context is current per `GlowContext::new`.
            unsafe { self.gl.delete_buffer(buffer) };
        }
    }
}

// ── conversions ───────────────────────────────────────────────────────────

fn gl_stage(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn gl_buffer_target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Array => glow::ARRAY_BUFFER,
        BufferTarget::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
    }
}

fn gl_texture_target(target: TextureTarget) -> u32 {
    match target {
        TextureTarget::Texture2D => glow::TEXTURE_2D,
        TextureTarget::CubeMap => glow::TEXTURE_CUBE_MAP,
        TextureTarget::External => TEXTURE_EXTERNAL_OES,
    }
}

fn gl_topology(topology: PrimitiveTopology) -> u32 {
    match topology {
        PrimitiveTopology::TriangleList => glow::TRIANGLES,
    }
}

fn gl_index_format(format: IndexFormat) -> u32 {
    match format {
        IndexFormat::Uint16 => glow::UNSIGNED_SHORT,
    }
}

#[inline]
fn uniform(location: UniformLocation) -> glow::NativeUniformLocation {
    glow::NativeUniformLocation(location.0)
}

// ── GlApi ─────────────────────────────────────────────────────────────────

// SAFETY (all blocks below): the context is current on this thread, which is the
// contract of `GlowContext::new`. Handles only ever come from this same context.
impl GlApi for GlowContext {
    fn supports_vertex_arrays(&self) -> bool {
        self.vertex_arrays
    }

    fn has_default_vertex_array(&self) -> bool {
        !self.core_profile
    }

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<ShaderHandle, String> {
        unsafe {
            let shader = self.gl.create_shader(gl_stage(stage))?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if !self.gl.get_shader_compile_status(shader) {
                let info = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                return Err(info);
            }
            Ok(ShaderHandle(shader.0))
        }
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        unsafe { self.gl.delete_shader(glow::NativeShader(shader.0)) }
    }

    fn link_program(
        &self,
        vertex: ShaderHandle,
        fragment: ShaderHandle,
    ) -> Result<ProgramHandle, String> {
        unsafe {
            let program = self.gl.create_program()?;
            let vs = glow::NativeShader(vertex.0);
            let fs = glow::NativeShader(fragment.0);
            self.gl.attach_shader(program, vs);
            self.gl.attach_shader(program, fs);
            self.gl.link_program(program);
            self.gl.detach_shader(program, vs);
            self.gl.detach_shader(program, fs);
            if !self.gl.get_program_link_status(program) {
                let info = self.gl.get_program_info_log(program);
                self.gl.delete_program(program);
                return Err(info);
            }
            Ok(ProgramHandle(program.0))
        }
    }

    fn delete_program(&self, program: ProgramHandle) {
        unsafe { self.gl.delete_program(glow::NativeProgram(program.0)) }
    }

    fn attrib_location(&self, program: ProgramHandle, name: &str) -> Option<AttribLocation> {
        unsafe {
            self.gl
                .get_attrib_location(glow::NativeProgram(program.0), name)
                .map(AttribLocation)
        }
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        unsafe {
            self.gl
                .get_uniform_location(glow::NativeProgram(program.0), name)
                .map(|l| UniformLocation(l.0))
        }
    }

    fn use_program(&self, program: Option<ProgramHandle>) {
        unsafe { self.gl.use_program(program.map(|p| glow::NativeProgram(p.0))) }
    }

    fn uniform_matrix4(&self, location: UniformLocation, transpose: bool, value: &[f32; 16]) {
        unsafe {
            self.gl
                .uniform_matrix_4_f32_slice(Some(&uniform(location)), transpose, value)
        }
    }

    fn uniform_1i(&self, location: UniformLocation, value: i32) {
        unsafe { self.gl.uniform_1_i32(Some(&uniform(location)), value) }
    }

    fn uniform_3f(&self, location: UniformLocation, value: [f32; 3]) {
        unsafe {
            self.gl
                .uniform_3_f32(Some(&uniform(location)), value[0], value[1], value[2])
        }
    }

    fn uniform_1f(&self, location: UniformLocation, value: f32) {
        unsafe { self.gl.uniform_1_f32(Some(&uniform(location)), value) }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) }
    }

    fn bind_texture(&self, target: TextureTarget, texture: Option<TextureHandle>) {
        unsafe {
            self.gl.bind_texture(
                gl_texture_target(target),
                texture.map(|t| glow::NativeTexture(t.0)),
            )
        }
    }

    fn create_buffer(&self) -> Result<BufferHandle, String> {
        unsafe { self.gl.create_buffer().map(|b| BufferHandle(b.0)) }
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferHandle>) {
        unsafe {
            self.gl.bind_buffer(
                gl_buffer_target(target),
                buffer.map(|b| glow::NativeBuffer(b.0)),
            )
        }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(gl_buffer_target(target), data, glow::STATIC_DRAW)
        }
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        unsafe { self.gl.delete_buffer(glow::NativeBuffer(buffer.0)) }
    }

    fn create_vertex_array(&self) -> Result<VertexArrayHandle, String> {
        unsafe {
            self.gl
                .create_vertex_array()
                .map(|v| VertexArrayHandle(v.0))
        }
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>) {
        unsafe {
            self.gl
                .bind_vertex_array(vertex_array.map(|v| glow::NativeVertexArray(v.0)))
        }
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle) {
        unsafe {
            self.gl
                .delete_vertex_array(glow::NativeVertexArray(vertex_array.0))
        }
    }

    fn vertex_attrib_pointer(
        &self,
        location: AttribLocation,
        components: i32,
        source: AttribSource<'_>,
    ) {
        let offset = match source {
            AttribSource::Buffer { offset } => offset as i32,
            AttribSource::Client(data) => {
                let streamed = self.stream(
                    StreamSlot::Attrib(location.0),
                    glow::ARRAY_BUFFER,
                    bytemuck::cast_slice(data),
                );
                if let Err(e) = streamed {
                    log::warn!("attribute {} not streamed: {e}", location.0);
                    self.faults.attribute_failed();
                    return;
                }
                0
            }
        };
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(location.0, components, glow::FLOAT, false, 0, offset);
            if matches!(source, AttribSource::Client(_)) {
                // The pointer has captured the scratch buffer.
                self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
            }
        }
    }

    fn enable_vertex_attrib_array(&self, location: AttribLocation) {
        unsafe { self.gl.enable_vertex_attrib_array(location.0) }
    }

    fn draw_elements(
        &self,
        topology: PrimitiveTopology,
        format: IndexFormat,
        count: i32,
        indices: IndexSource<'_>,
    ) {
        let offset = match indices {
            IndexSource::Buffer { offset } => offset as i32,
            IndexSource::Client(data) => {
                if !self.faults.take_draw_allowed() {
                    log::warn!("client-array draw skipped: attribute data missing");
                    return;
                }
                let streamed = self.stream(
                    StreamSlot::Index,
                    glow::ELEMENT_ARRAY_BUFFER,
                    bytemuck::cast_slice(data),
                );
                if let Err(e) = streamed {
                    log::warn!("client-array draw skipped: indices not streamed: {e}");
                    self.faults.index_failed();
                    return;
                }
                0
            }
        };
        unsafe {
            self.gl
                .draw_elements(gl_topology(topology), count, gl_index_format(format), offset)
        }
    }

    fn get_error(&self) -> Option<u32> {
        if let Some(code) = self.faults.pop_error() {
            return Some(code);
        }
        match unsafe { self.gl.get_error() } {
            glow::NO_ERROR => None,
            code => Some(code),
        }
    }
}
