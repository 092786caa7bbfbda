use std::collections::HashMap;

use crate::gl::{AttribLocation, GlApi, ProgramHandle, ShaderStage, UniformLocation};

use super::error::{CompileError, CompileStage, ProgramError, SymbolKind, SymbolNotFoundError};

/// Resolved attribute or uniform slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    Attribute(AttribLocation),
    Uniform(UniformLocation),
}

/// A linked vertex + fragment program and its resolved symbol slots.
///
/// The GPU program lives until [`destroy`](Self::destroy); dropping without
/// destroying logs a leak (deleting needs the context, which `Drop` lacks).
#[derive(Debug)]
pub struct ShaderProgram {
    label: String,
    handle: Option<ProgramHandle>,
    slots: HashMap<(SymbolKind, String), Slot>,
}

impl ShaderProgram {
    /// Compiles and links `vertex_source` + `fragment_source`.
    ///
    /// On failure every intermediate GPU object is released and the error carries
    /// the driver log; there is no partially built program.
    pub fn create(
        gl: &dyn GlApi,
        label: impl Into<String>,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, CompileError> {
        let label = label.into();
        let fail = |stage, log| CompileError {
            label: label.clone(),
            stage,
            log,
        };

        let vs = gl
            .compile_shader(ShaderStage::Vertex, vertex_source)
            .map_err(|log| fail(CompileStage::Vertex, log))?;

        let fs = match gl.compile_shader(ShaderStage::Fragment, fragment_source) {
            Ok(fs) => fs,
            Err(log) => {
                gl.delete_shader(vs);
                return Err(fail(CompileStage::Fragment, log));
            }
        };

        let linked = gl.link_program(vs, fs);
        gl.delete_shader(vs);
        gl.delete_shader(fs);
        let handle = linked.map_err(|log| fail(CompileStage::Link, log))?;

        log::debug!("program '{label}' linked as {handle:?}");

        Ok(Self {
            label,
            handle: Some(handle),
            slots: HashMap::new(),
        })
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// GPU handle, `None` once destroyed.
    #[inline]
    pub fn handle(&self) -> Option<ProgramHandle> {
        self.handle
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.handle.is_none()
    }

    /// Resolves `name` as an attribute or uniform. Results are cached per name.
    pub fn locate(
        &mut self,
        gl: &dyn GlApi,
        name: &str,
        kind: SymbolKind,
    ) -> Result<Slot, ProgramError> {
        let handle = self.handle.ok_or_else(|| ProgramError::Destroyed {
            program: self.label.clone(),
        })?;

        let key = (kind, name.to_string());
        if let Some(slot) = self.slots.get(&key) {
            return Ok(*slot);
        }

        let slot = match kind {
            SymbolKind::Attribute => gl.attrib_location(handle, name).map(Slot::Attribute),
            SymbolKind::Uniform => gl.uniform_location(handle, name).map(Slot::Uniform),
        }
        .ok_or_else(|| SymbolNotFoundError {
            program: self.label.clone(),
            name: name.to_string(),
            kind,
        })?;

        self.slots.insert(key, slot);
        Ok(slot)
    }

    pub fn attribute(
        &mut self,
        gl: &dyn GlApi,
        name: &str,
    ) -> Result<AttribLocation, ProgramError> {
        match self.locate(gl, name, SymbolKind::Attribute)? {
            Slot::Attribute(location) => Ok(location),
            Slot::Uniform(_) => unreachable!("attribute lookup cached a uniform slot"),
        }
    }

    pub fn uniform(
        &mut self,
        gl: &dyn GlApi,
        name: &str,
    ) -> Result<UniformLocation, ProgramError> {
        match self.locate(gl, name, SymbolKind::Uniform)? {
            Slot::Uniform(location) => Ok(location),
            Slot::Attribute(_) => unreachable!("uniform lookup cached an attribute slot"),
        }
    }

    /// Makes this the active program.
    pub fn bind(&self, gl: &dyn GlApi) -> Result<(), ProgramError> {
        let handle = self.handle.ok_or_else(|| ProgramError::Destroyed {
            program: self.label.clone(),
        })?;
        gl.use_program(Some(handle));
        Ok(())
    }

    /// Deletes the GPU program and forgets all slots. Later calls are no-ops.
    pub fn destroy(&mut self, gl: &dyn GlApi) {
        if let Some(handle) = self.handle.take() {
            gl.delete_program(handle);
            self.slots.clear();
            log::debug!("program '{}' destroyed", self.label);
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        if let Some(handle) = self.handle {
            log::warn!(
                "program '{}' ({handle:?}) dropped without destroy(); GPU object leaked",
                self.label
            );
        }
    }
}
