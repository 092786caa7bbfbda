use super::types::{
    AttribLocation, AttribSource, BufferHandle, BufferTarget, IndexFormat, IndexSource,
    PrimitiveTopology, ProgramHandle, ShaderHandle, ShaderStage, TextureHandle, TextureTarget,
    UniformLocation, VertexArrayHandle,
};

/// The graphics-context surface the lit pipeline is written against.
///
/// Mirrors the OpenGL ES 2/3 entry points the renderer needs and nothing more.
/// Methods take `&self` like `glow::HasContext`; implementations are expected
/// to be used from the one thread that owns the current context.
///
/// Fallible creation calls return the driver's message as `String`, matching
/// what glow hands back. Compile/link failures carry the info log.
///
/// Textures are only bound here. Whoever uploads them deletes them.
pub trait GlApi {
    /// Whether vertex array objects are available on this context.
    fn supports_vertex_arrays(&self) -> bool;

    /// Whether attribute pointers and draws work with no vertex array bound.
    ///
    /// False on desktop core profiles, which have no default vertex array; client
    /// arrays cannot be drawn there.
    fn has_default_vertex_array(&self) -> bool;

    // ── programs ──────────────────────────────────────────────────────────

    /// Compiles one stage. On failure no shader object is left behind.
    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<ShaderHandle, String>;

    fn delete_shader(&self, shader: ShaderHandle);

    /// Links both stages into a program. On failure no program object is left behind;
    /// the shader objects stay owned by the caller either way.
    fn link_program(
        &self,
        vertex: ShaderHandle,
        fragment: ShaderHandle,
    ) -> Result<ProgramHandle, String>;

    fn delete_program(&self, program: ProgramHandle);

    fn attrib_location(&self, program: ProgramHandle, name: &str) -> Option<AttribLocation>;

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;

    fn use_program(&self, program: Option<ProgramHandle>);

    // ── uniforms ──────────────────────────────────────────────────────────

    /// Uploads one 4×4 matrix given in column-major order.
    fn uniform_matrix4(&self, location: UniformLocation, transpose: bool, value: &[f32; 16]);

    fn uniform_1i(&self, location: UniformLocation, value: i32);

    fn uniform_3f(&self, location: UniformLocation, value: [f32; 3]);

    fn uniform_1f(&self, location: UniformLocation, value: f32);

    // ── textures ──────────────────────────────────────────────────────────

    /// Selects texture unit `unit` (0-based) for subsequent `bind_texture` calls.
    fn active_texture(&self, unit: u32);

    fn bind_texture(&self, target: TextureTarget, texture: Option<TextureHandle>);

    // ── buffers & vertex arrays ───────────────────────────────────────────

    fn create_buffer(&self) -> Result<BufferHandle, String>;

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferHandle>);

    /// Uploads `data` into the buffer bound at `target` (static usage).
    fn buffer_data(&self, target: BufferTarget, data: &[u8]);

    fn delete_buffer(&self, buffer: BufferHandle);

    fn create_vertex_array(&self) -> Result<VertexArrayHandle, String>;

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>);

    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle);

    /// Points float attribute `location` at `components`-wide, tightly packed data.
    fn vertex_attrib_pointer(
        &self,
        location: AttribLocation,
        components: i32,
        source: AttribSource<'_>,
    );

    fn enable_vertex_attrib_array(&self, location: AttribLocation);

    // ── draw & diagnostics ────────────────────────────────────────────────

    fn draw_elements(
        &self,
        topology: PrimitiveTopology,
        format: IndexFormat,
        count: i32,
        indices: IndexSource<'_>,
    );

    /// Pops one pending error code, `None` once the queue is empty.
    fn get_error(&self) -> Option<u32>;
}
