use crate::gl::{
    AttribLocation, AttribSource, BufferHandle, BufferTarget, GlApi, VertexArrayHandle,
};

use super::GeometryError;

/// Texture coordinates, either 2- or 3-component per vertex.
#[derive(Debug, Clone, PartialEq)]
pub enum TexCoords {
    Uv(Vec<[f32; 2]>),
    Uvw(Vec<[f32; 3]>),
}

impl TexCoords {
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            TexCoords::Uv(v) => v.len(),
            TexCoords::Uvw(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Floats per vertex.
    #[inline]
    pub fn components(&self) -> i32 {
        match self {
            TexCoords::Uv(_) => 2,
            TexCoords::Uvw(_) => 3,
        }
    }

    #[inline]
    pub fn as_floats(&self) -> &[f32] {
        match self {
            TexCoords::Uv(v) => bytemuck::cast_slice(v),
            TexCoords::Uvw(v) => bytemuck::cast_slice(v),
        }
    }
}

/// Attribute slots a vertex array was (or is to be) built against.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AttributeLocations {
    pub position: AttribLocation,
    pub tex_coord: AttribLocation,
    pub normal: AttribLocation,
}

/// GPU objects backing a built vertex array, plus what they were built from.
#[derive(Debug)]
struct VertexArrayCache {
    vertex_array: VertexArrayHandle,
    buffers: GpuBuffers,
    locations: AttributeLocations,
    generation: u64,
}

#[derive(Debug, Copy, Clone)]
struct GpuBuffers {
    positions: BufferHandle,
    tex_coords: BufferHandle,
    normals: BufferHandle,
    indices: BufferHandle,
}

impl GpuBuffers {
    fn create(gl: &dyn GlApi) -> Result<Self, GeometryError> {
        let mut created: Vec<BufferHandle> = Vec::with_capacity(4);
        for _ in 0..4 {
            match gl.create_buffer() {
                Ok(b) => created.push(b),
                Err(details) => {
                    for b in created {
                        gl.delete_buffer(b);
                    }
                    return Err(GeometryError::Allocation {
                        what: "vertex buffer",
                        details,
                    });
                }
            }
        }
        Ok(Self {
            positions: created[0],
            tex_coords: created[1],
            normals: created[2],
            indices: created[3],
        })
    }

    fn delete(self, gl: &dyn GlApi) {
        gl.delete_buffer(self.positions);
        gl.delete_buffer(self.tex_coords);
        gl.delete_buffer(self.normals);
        gl.delete_buffer(self.indices);
    }
}

/// Per-vertex arrays and triangle-list indices for one mesh.
///
/// CPU data is always kept; a vertex array object is built lazily by
/// [`ensure_vao`](Self::ensure_vao) for contexts that support it.
///
/// Every mutation bumps [`generation`](Self::generation). A cached vertex array
/// remembers the generation and attribute locations it was built with and is
/// rebuilt when either differs.
///
/// GPU objects need the context to be released, so call [`destroy`](Self::destroy)
/// before dropping. Dropping with a live vertex array logs a leak.
#[derive(Debug)]
pub struct GeometryBuffer {
    positions: Vec<[f32; 3]>,
    tex_coords: TexCoords,
    normals: Vec<[f32; 3]>,
    indices: Vec<u16>,
    generation: u64,
    vao: Option<VertexArrayCache>,
}

impl GeometryBuffer {
    pub fn new(
        positions: Vec<[f32; 3]>,
        tex_coords: TexCoords,
        normals: Vec<[f32; 3]>,
        indices: Vec<u16>,
    ) -> Result<Self, GeometryError> {
        validate_vertices(&positions, &tex_coords, &normals)?;
        validate_indices(&indices, positions.len())?;
        Ok(Self {
            positions,
            tex_coords,
            normals,
            indices,
            generation: 0,
            vao: None,
        })
    }

    #[inline]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    #[inline]
    pub fn tex_coords(&self) -> &TexCoords {
        &self.tex_coords
    }

    #[inline]
    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    #[inline]
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replaces all per-vertex arrays. Existing indices must still be in range.
    pub fn set_vertices(
        &mut self,
        positions: Vec<[f32; 3]>,
        tex_coords: TexCoords,
        normals: Vec<[f32; 3]>,
    ) -> Result<(), GeometryError> {
        validate_vertices(&positions, &tex_coords, &normals)?;
        validate_indices(&self.indices, positions.len())?;
        self.positions = positions;
        self.tex_coords = tex_coords;
        self.normals = normals;
        self.generation += 1;
        Ok(())
    }

    pub fn set_indices(&mut self, indices: Vec<u16>) -> Result<(), GeometryError> {
        validate_indices(&indices, self.positions.len())?;
        self.indices = indices;
        self.generation += 1;
        Ok(())
    }

    /// Cached vertex array, if one has been built and not destroyed.
    #[inline]
    pub fn vertex_array(&self) -> Option<VertexArrayHandle> {
        self.vao.as_ref().map(|c| c.vertex_array)
    }

    /// Whether the cached vertex array matches `locations` and the current data.
    pub fn is_vao_current(&self, locations: AttributeLocations) -> bool {
        self.vao
            .as_ref()
            .is_some_and(|c| c.locations == locations && c.generation == self.generation)
    }

    /// Returns the vertex array for `locations`, building or rebuilding it if needed.
    ///
    /// Leaves no vertex array or array buffer bound.
    pub fn ensure_vao(
        &mut self,
        gl: &dyn GlApi,
        locations: AttributeLocations,
    ) -> Result<VertexArrayHandle, GeometryError> {
        if let Some(cache) = self.vao.as_ref().filter(|_| self.is_vao_current(locations)) {
            return Ok(cache.vertex_array);
        }

        if let Some(stale) = self.vao.take() {
            log::debug!(
                "rebuilding vertex array {:?} (generation {} -> {})",
                stale.vertex_array,
                stale.generation,
                self.generation
            );
            release(gl, stale);
        }

        let buffers = GpuBuffers::create(gl)?;
        let vertex_array = match gl.create_vertex_array() {
            Ok(v) => v,
            Err(details) => {
                buffers.delete(gl);
                return Err(GeometryError::Allocation {
                    what: "vertex array",
                    details,
                });
            }
        };

        gl.bind_vertex_array(Some(vertex_array));

        self.upload_attribute(
            gl,
            buffers.positions,
            locations.position,
            3,
            bytemuck::cast_slice(&self.positions),
        );
        self.upload_attribute(
            gl,
            buffers.tex_coords,
            locations.tex_coord,
            self.tex_coords.components(),
            self.tex_coords.as_floats(),
        );
        self.upload_attribute(
            gl,
            buffers.normals,
            locations.normal,
            3,
            bytemuck::cast_slice(&self.normals),
        );

        // Element binding is part of the vertex array state; keep it bound.
        gl.bind_buffer(BufferTarget::ElementArray, Some(buffers.indices));
        gl.buffer_data(BufferTarget::ElementArray, bytemuck::cast_slice(&self.indices));

        gl.bind_vertex_array(None);
        gl.bind_buffer(BufferTarget::Array, None);

        log::debug!(
            "built vertex array {:?}: {} vertices, {} indices",
            vertex_array,
            self.positions.len(),
            self.indices.len()
        );

        self.vao = Some(VertexArrayCache {
            vertex_array,
            buffers,
            locations,
            generation: self.generation,
        });
        Ok(vertex_array)
    }

    fn upload_attribute(
        &self,
        gl: &dyn GlApi,
        buffer: BufferHandle,
        location: AttribLocation,
        components: i32,
        data: &[f32],
    ) {
        gl.bind_buffer(BufferTarget::Array, Some(buffer));
        gl.buffer_data(BufferTarget::Array, bytemuck::cast_slice(data));
        gl.vertex_attrib_pointer(location, components, AttribSource::Buffer { offset: 0 });
        gl.enable_vertex_attrib_array(location);
    }

    /// Releases the vertex array and its buffers. Safe to call repeatedly.
    ///
    /// CPU data is kept; a later `ensure_vao` builds a fresh vertex array.
    pub fn destroy(&mut self, gl: &dyn GlApi) {
        if let Some(cache) = self.vao.take() {
            release(gl, cache);
        }
    }
}

impl Drop for GeometryBuffer {
    fn drop(&mut self) {
        if let Some(cache) = &self.vao {
            log::warn!(
                "GeometryBuffer dropped with live vertex array {:?}; call destroy() first",
                cache.vertex_array
            );
        }
    }
}

fn release(gl: &dyn GlApi, cache: VertexArrayCache) {
    gl.delete_vertex_array(cache.vertex_array);
    cache.buffers.delete(gl);
}

fn validate_vertices(
    positions: &[[f32; 3]],
    tex_coords: &TexCoords,
    normals: &[[f32; 3]],
) -> Result<(), GeometryError> {
    let expected = positions.len();
    if tex_coords.len() != expected {
        return Err(GeometryError::LengthMismatch {
            attribute: "tex_coord",
            expected,
            found: tex_coords.len(),
        });
    }
    if normals.len() != expected {
        return Err(GeometryError::LengthMismatch {
            attribute: "normal",
            expected,
            found: normals.len(),
        });
    }
    Ok(())
}

fn validate_indices(indices: &[u16], vertex_count: usize) -> Result<(), GeometryError> {
    if indices.len() % 3 != 0 {
        return Err(GeometryError::IncompleteTriangle {
            index_count: indices.len(),
        });
    }
    if let Some(&index) = indices.iter().find(|&&i| usize::from(i) >= vertex_count) {
        return Err(GeometryError::IndexOutOfRange {
            index,
            vertex_count,
        });
    }
    Ok(())
}
