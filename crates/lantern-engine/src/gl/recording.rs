//! Test-only `GlApi` that records every call instead of talking to a driver.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::num::NonZeroU32;

use super::api::GlApi;
use super::types::{
    AttribLocation, AttribSource, BufferHandle, BufferTarget, IndexFormat, IndexSource,
    PrimitiveTopology, ProgramHandle, ShaderHandle, ShaderStage, TextureHandle, TextureTarget,
    UniformLocation, VertexArrayHandle,
};

/// One recorded call. Location queries are not recorded; they do not change state.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum GlCall {
    CompileShader(ShaderStage),
    DeleteShader(ShaderHandle),
    LinkProgram,
    DeleteProgram(ProgramHandle),
    UseProgram(Option<ProgramHandle>),
    UniformMatrix4 {
        location: UniformLocation,
        transpose: bool,
        value: [f32; 16],
    },
    Uniform1i(UniformLocation, i32),
    Uniform3f(UniformLocation, [f32; 3]),
    Uniform1f(UniformLocation, f32),
    ActiveTexture(u32),
    BindTexture(TextureTarget, Option<TextureHandle>),
    CreateBuffer(BufferHandle),
    BindBuffer(BufferTarget, Option<BufferHandle>),
    BufferData { target: BufferTarget, len: usize },
    DeleteBuffer(BufferHandle),
    CreateVertexArray(VertexArrayHandle),
    BindVertexArray(Option<VertexArrayHandle>),
    DeleteVertexArray(VertexArrayHandle),
    VertexAttribPointer {
        location: AttribLocation,
        components: i32,
        client_len: Option<usize>,
    },
    EnableVertexAttribArray(AttribLocation),
    DrawElements {
        topology: PrimitiveTopology,
        format: IndexFormat,
        count: i32,
        client_len: Option<usize>,
    },
    GetError,
}

#[derive(Default)]
pub(crate) struct RecordingGl {
    pub vertex_arrays: bool,
    /// Desktop core profile: vertex arrays required, no default one.
    pub core_profile: bool,
    pub fail_stage: Option<ShaderStage>,
    pub fail_link: bool,
    pub missing_symbols: Vec<&'static str>,

    // Visible crate-wide so tests can use struct update syntax.
    pub(crate) next_id: Cell<u32>,
    pub(crate) calls: RefCell<Vec<GlCall>>,
    pub(crate) pending_errors: RefCell<Vec<u32>>,
    pub(crate) symbols: RefCell<HashMap<String, u32>>,
    pub(crate) shader_sources: RefCell<HashMap<ShaderHandle, String>>,
    pub(crate) program_sources: RefCell<HashMap<ProgramHandle, String>>,

    pub(crate) live_programs: RefCell<HashSet<ProgramHandle>>,
    pub(crate) live_shaders: RefCell<HashSet<ShaderHandle>>,
    pub(crate) live_buffers: RefCell<HashSet<BufferHandle>>,
    pub(crate) live_vertex_arrays: RefCell<HashSet<VertexArrayHandle>>,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vertex_arrays() -> Self {
        Self {
            vertex_arrays: true,
            ..Self::default()
        }
    }

    pub fn core_profile() -> Self {
        Self {
            vertex_arrays: true,
            core_profile: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<GlCall> {
        self.calls.borrow().clone()
    }

    /// Returns and clears the recorded calls.
    pub fn take_calls(&self) -> Vec<GlCall> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    pub fn push_error(&self, code: u32) {
        self.pending_errors.borrow_mut().push(code);
    }

    pub fn live_programs(&self) -> usize {
        self.live_programs.borrow().len()
    }

    pub fn live_shaders(&self) -> usize {
        self.live_shaders.borrow().len()
    }

    pub fn live_buffers(&self) -> usize {
        self.live_buffers.borrow().len()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.live_vertex_arrays.borrow().len()
    }

    fn record(&self, call: GlCall) {
        self.calls.borrow_mut().push(call);
    }

    fn next(&self) -> NonZeroU32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        NonZeroU32::new(id).unwrap_or(NonZeroU32::MIN)
    }

    /// Stable per-name slot so repeated lookups agree.
    ///
    /// Like a driver, only names the linked source declares with `qualifier`
    /// resolve.
    fn symbol(&self, program: ProgramHandle, qualifier: &str, name: &str) -> Option<u32> {
        if self.missing_symbols.iter().any(|s| *s == name) {
            return None;
        }
        let declared = self
            .program_sources
            .borrow()
            .get(&program)
            .is_some_and(|source| declares(source, qualifier, name));
        if !declared {
            return None;
        }
        let mut symbols = self.symbols.borrow_mut();
        let n = symbols.len() as u32;
        Some(*symbols.entry(name.to_string()).or_insert(n))
    }
}

/// Whether `source` has a `<qualifier> [precision] <type> <name>;` declaration.
pub(crate) fn declares(source: &str, qualifier: &str, name: &str) -> bool {
    let code: String = source
        .lines()
        .map(|line| line.split("//").next().unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\n");

    code.split(';').any(|statement| {
        let tokens: Vec<&str> = statement.split_whitespace().collect();
        tokens.first() == Some(&qualifier) && tokens.last() == Some(&name)
    })
}

impl GlApi for RecordingGl {
    fn supports_vertex_arrays(&self) -> bool {
        self.vertex_arrays
    }

    fn has_default_vertex_array(&self) -> bool {
        !self.core_profile
    }

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<ShaderHandle, String> {
        self.record(GlCall::CompileShader(stage));
        if self.fail_stage == Some(stage) {
            return Err(format!("0:1: {} stage rejected", stage.as_str()));
        }
        let handle = ShaderHandle(self.next());
        self.live_shaders.borrow_mut().insert(handle);
        self.shader_sources
            .borrow_mut()
            .insert(handle, source.to_string());
        Ok(handle)
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        self.record(GlCall::DeleteShader(shader));
        self.live_shaders.borrow_mut().remove(&shader);
        self.shader_sources.borrow_mut().remove(&shader);
    }

    fn link_program(
        &self,
        vertex: ShaderHandle,
        fragment: ShaderHandle,
    ) -> Result<ProgramHandle, String> {
        self.record(GlCall::LinkProgram);
        if self.fail_link {
            return Err("varying v_tex_coord type mismatch".to_string());
        }
        let handle = ProgramHandle(self.next());
        self.live_programs.borrow_mut().insert(handle);
        let sources = self.shader_sources.borrow();
        let linked = [vertex, fragment]
            .iter()
            .filter_map(|shader| sources.get(shader).map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n");
        self.program_sources.borrow_mut().insert(handle, linked);
        Ok(handle)
    }

    fn delete_program(&self, program: ProgramHandle) {
        self.record(GlCall::DeleteProgram(program));
        self.live_programs.borrow_mut().remove(&program);
    }

    fn attrib_location(&self, program: ProgramHandle, name: &str) -> Option<AttribLocation> {
        self.symbol(program, "attribute", name).map(AttribLocation)
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        self.symbol(program, "uniform", name).map(UniformLocation)
    }

    fn use_program(&self, program: Option<ProgramHandle>) {
        self.record(GlCall::UseProgram(program));
    }

    fn uniform_matrix4(&self, location: UniformLocation, transpose: bool, value: &[f32; 16]) {
        self.record(GlCall::UniformMatrix4 {
            location,
            transpose,
            value: *value,
        });
    }

    fn uniform_1i(&self, location: UniformLocation, value: i32) {
        self.record(GlCall::Uniform1i(location, value));
    }

    fn uniform_3f(&self, location: UniformLocation, value: [f32; 3]) {
        self.record(GlCall::Uniform3f(location, value));
    }

    fn uniform_1f(&self, location: UniformLocation, value: f32) {
        self.record(GlCall::Uniform1f(location, value));
    }

    fn active_texture(&self, unit: u32) {
        self.record(GlCall::ActiveTexture(unit));
    }

    fn bind_texture(&self, target: TextureTarget, texture: Option<TextureHandle>) {
        self.record(GlCall::BindTexture(target, texture));
    }

    fn create_buffer(&self) -> Result<BufferHandle, String> {
        let handle = BufferHandle(self.next());
        self.record(GlCall::CreateBuffer(handle));
        self.live_buffers.borrow_mut().insert(handle);
        Ok(handle)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferHandle>) {
        self.record(GlCall::BindBuffer(target, buffer));
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        self.record(GlCall::BufferData {
            target,
            len: data.len(),
        });
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        self.record(GlCall::DeleteBuffer(buffer));
        self.live_buffers.borrow_mut().remove(&buffer);
    }

    fn create_vertex_array(&self) -> Result<VertexArrayHandle, String> {
        if !self.vertex_arrays {
            return Err("vertex array objects unsupported".to_string());
        }
        let handle = VertexArrayHandle(self.next());
        self.record(GlCall::CreateVertexArray(handle));
        self.live_vertex_arrays.borrow_mut().insert(handle);
        Ok(handle)
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>) {
        self.record(GlCall::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle) {
        self.record(GlCall::DeleteVertexArray(vertex_array));
        self.live_vertex_arrays.borrow_mut().remove(&vertex_array);
    }

    fn vertex_attrib_pointer(
        &self,
        location: AttribLocation,
        components: i32,
        source: AttribSource<'_>,
    ) {
        let client_len = match source {
            AttribSource::Buffer { .. } => None,
            AttribSource::Client(data) => Some(data.len()),
        };
        self.record(GlCall::VertexAttribPointer {
            location,
            components,
            client_len,
        });
    }

    fn enable_vertex_attrib_array(&self, location: AttribLocation) {
        self.record(GlCall::EnableVertexAttribArray(location));
    }

    fn draw_elements(
        &self,
        topology: PrimitiveTopology,
        format: IndexFormat,
        count: i32,
        indices: IndexSource<'_>,
    ) {
        let client_len = match indices {
            IndexSource::Buffer { .. } => None,
            IndexSource::Client(data) => Some(data.len()),
        };
        self.record(GlCall::DrawElements {
            topology,
            format,
            count,
            client_len,
        });
    }

    fn get_error(&self) -> Option<u32> {
        self.record(GlCall::GetError);
        self.pending_errors.borrow_mut().pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declarations_match_qualifier_and_name() {
        let source = "precision highp float;\n\
                      // uniform float u_commented;\n\
                      uniform lowp vec3 u_color;\n\
                      attribute vec4 a_position;\n";

        assert!(declares(source, "uniform", "u_color"));
        assert!(declares(source, "attribute", "a_position"));
        assert!(!declares(source, "uniform", "a_position"));
        assert!(!declares(source, "uniform", "u_commented"));
        assert!(!declares(source, "uniform", "u_col"));
    }

    #[test]
    fn undeclared_names_do_not_resolve() {
        let gl = RecordingGl::new();
        let vs = gl
            .compile_shader(ShaderStage::Vertex, "attribute vec4 a_position;")
            .unwrap();
        let fs = gl
            .compile_shader(ShaderStage::Fragment, "uniform float u_opacity;")
            .unwrap();
        let program = gl.link_program(vs, fs).unwrap();

        assert!(gl.attrib_location(program, "a_position").is_some());
        assert!(gl.uniform_location(program, "u_opacity").is_some());
        assert!(gl.attrib_location(program, "a_normal").is_none());
        assert!(gl.uniform_location(program, "a_position").is_none());
    }
}
