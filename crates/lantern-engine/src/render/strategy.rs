use crate::gl::{
    AttribSource, GlApi, IndexFormat, IndexSource, PrimitiveTopology, VertexArrayHandle,
};
use crate::mesh::{AttributeLocations, GeometryBuffer, GeometryError};

/// Requested geometry path, resolved against the context at renderer creation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum StrategyPreference {
    /// Vertex arrays when the context has them, legacy attributes otherwise.
    #[default]
    Auto,
    /// Vertex arrays; falls back to legacy (with a warning) if unsupported.
    VertexArray,
    /// Client arrays; upgraded to vertex arrays (with a warning) on contexts
    /// without a default vertex array.
    Legacy,
}

/// How a renderer feeds geometry to its program. Fixed for the renderer's lifetime.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DrawStrategy {
    /// Per-mesh cached vertex array object with GPU-resident buffers.
    VertexArray,
    /// Attribute pointers and indices read from CPU arrays on every draw.
    Legacy,
}

/// Geometry state established by [`DrawStrategy::bind`], consumed by `draw`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum BoundGeometry {
    VertexArray(VertexArrayHandle),
    ClientArrays,
}

impl DrawStrategy {
    pub fn select(gl: &dyn GlApi, preference: StrategyPreference) -> Self {
        let supported = gl.supports_vertex_arrays();
        let client_arrays = gl.has_default_vertex_array();
        match preference {
            StrategyPreference::Auto if supported => DrawStrategy::VertexArray,
            StrategyPreference::Auto => DrawStrategy::Legacy,
            StrategyPreference::VertexArray if supported => DrawStrategy::VertexArray,
            StrategyPreference::VertexArray => {
                log::warn!("vertex arrays requested but unsupported by context; using legacy path");
                DrawStrategy::Legacy
            }
            StrategyPreference::Legacy if !client_arrays && supported => {
                log::warn!("legacy path requested but context has no default vertex array; using vertex arrays");
                DrawStrategy::VertexArray
            }
            StrategyPreference::Legacy => DrawStrategy::Legacy,
        }
    }

    /// Makes `geometry` available at `locations`.
    ///
    /// Vertex-array path builds or reuses the mesh's cached vertex array. Legacy
    /// path points each attribute straight at the CPU arrays and enables it.
    pub(crate) fn bind(
        self,
        gl: &dyn GlApi,
        geometry: &mut GeometryBuffer,
        locations: AttributeLocations,
    ) -> Result<BoundGeometry, GeometryError> {
        match self {
            DrawStrategy::VertexArray => geometry
                .ensure_vao(gl, locations)
                .map(BoundGeometry::VertexArray),
            DrawStrategy::Legacy => {
                gl.vertex_attrib_pointer(
                    locations.position,
                    3,
                    AttribSource::Client(bytemuck::cast_slice(geometry.positions())),
                );
                gl.enable_vertex_attrib_array(locations.position);

                let tex_coords = geometry.tex_coords();
                gl.vertex_attrib_pointer(
                    locations.tex_coord,
                    tex_coords.components(),
                    AttribSource::Client(tex_coords.as_floats()),
                );
                gl.enable_vertex_attrib_array(locations.tex_coord);

                gl.vertex_attrib_pointer(
                    locations.normal,
                    3,
                    AttribSource::Client(bytemuck::cast_slice(geometry.normals())),
                );
                gl.enable_vertex_attrib_array(locations.normal);

                Ok(BoundGeometry::ClientArrays)
            }
        }
    }

    /// One indexed triangle-list draw over every index of `geometry`.
    pub(crate) fn draw(self, gl: &dyn GlApi, geometry: &GeometryBuffer, bound: BoundGeometry) {
        let count = geometry.index_count() as i32;
        match bound {
            BoundGeometry::VertexArray(vertex_array) => {
                gl.bind_vertex_array(Some(vertex_array));
                gl.draw_elements(
                    PrimitiveTopology::TriangleList,
                    IndexFormat::Uint16,
                    count,
                    IndexSource::Buffer { offset: 0 },
                );
                gl.bind_vertex_array(None);
            }
            BoundGeometry::ClientArrays => {
                gl.draw_elements(
                    PrimitiveTopology::TriangleList,
                    IndexFormat::Uint16,
                    count,
                    IndexSource::Client(geometry.indices()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::recording::RecordingGl;

    #[test]
    fn auto_follows_capability() {
        assert_eq!(
            DrawStrategy::select(&RecordingGl::with_vertex_arrays(), StrategyPreference::Auto),
            DrawStrategy::VertexArray
        );
        assert_eq!(
            DrawStrategy::select(&RecordingGl::new(), StrategyPreference::Auto),
            DrawStrategy::Legacy
        );
    }

    #[test]
    fn unsupported_vertex_array_request_falls_back() {
        assert_eq!(
            DrawStrategy::select(&RecordingGl::new(), StrategyPreference::VertexArray),
            DrawStrategy::Legacy
        );
    }

    #[test]
    fn legacy_request_upgraded_on_core_profile() {
        let gl = RecordingGl::core_profile();
        assert_eq!(
            DrawStrategy::select(&gl, StrategyPreference::Legacy),
            DrawStrategy::VertexArray
        );
        assert_eq!(
            DrawStrategy::select(&gl, StrategyPreference::Auto),
            DrawStrategy::VertexArray
        );
    }

    #[test]
    fn legacy_can_be_forced_on_capable_context() {
        assert_eq!(
            DrawStrategy::select(&RecordingGl::with_vertex_arrays(), StrategyPreference::Legacy),
            DrawStrategy::Legacy
        );
    }
}
