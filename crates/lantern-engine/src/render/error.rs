//! Error types for program construction and per-draw rendering.

use std::fmt;

use crate::gl::{GlApi, TextureTarget};
use crate::material::MaterialPropertyError;
use crate::mesh::GeometryError;

/// Which step of program creation failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CompileStage {
    Vertex,
    Fragment,
    Link,
}

impl CompileStage {
    pub fn as_str(self) -> &'static str {
        match self {
            CompileStage::Vertex => "vertex",
            CompileStage::Fragment => "fragment",
            CompileStage::Link => "link",
        }
    }
}

/// Shader compilation or program linking failed. Carries the driver's info log.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileError {
    pub label: String,
    pub stage: CompileStage,
    pub log: String,
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "program '{}' failed at {} stage: {}",
            self.label,
            self.stage.as_str(),
            self.log.trim_end()
        )
    }
}

impl std::error::Error for CompileError {}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Attribute,
    Uniform,
}

impl SymbolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Attribute => "attribute",
            SymbolKind::Uniform => "uniform",
        }
    }
}

/// A named attribute or uniform is not active in the linked program.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolNotFoundError {
    pub program: String,
    pub name: String,
    pub kind: SymbolKind,
}

impl fmt::Display for SymbolNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' not found in program '{}'",
            self.kind.as_str(),
            self.name,
            self.program
        )
    }
}

impl std::error::Error for SymbolNotFoundError {}

/// Failure to build a program or resolve its symbols.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgramError {
    Compile(CompileError),
    SymbolNotFound(SymbolNotFoundError),
    /// The program has already been destroyed; its slots are no longer valid.
    Destroyed { program: String },
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramError::Compile(err) => write!(f, "{err}"),
            ProgramError::SymbolNotFound(err) => write!(f, "{err}"),
            ProgramError::Destroyed { program } => {
                write!(f, "program '{program}' has been destroyed")
            }
        }
    }
}

impl std::error::Error for ProgramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProgramError::Compile(err) => Some(err),
            ProgramError::SymbolNotFound(err) => Some(err),
            ProgramError::Destroyed { .. } => None,
        }
    }
}

impl From<CompileError> for ProgramError {
    fn from(err: CompileError) -> Self {
        ProgramError::Compile(err)
    }
}

impl From<SymbolNotFoundError> for ProgramError {
    fn from(err: SymbolNotFoundError) -> Self {
        ProgramError::SymbolNotFound(err)
    }
}

/// A texture bound to a sampler of another target kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TargetMismatchError {
    pub expected: TextureTarget,
    pub found: TextureTarget,
}

impl fmt::Display for TargetMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "texture target mismatch: expected {}, found {}",
            self.expected.as_str(),
            self.found.as_str()
        )
    }
}

impl std::error::Error for TargetMismatchError {}

/// Error state reported by the context after a draw. Diagnostic only.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GraphicsStateError {
    pub code: u32,
    pub operation: &'static str,
}

// Bound on drained errors; a lost context can report the same code forever.
const MAX_DRAINED_ERRORS: usize = 16;

impl GraphicsStateError {
    /// Pops every pending error from the context.
    pub fn drain(gl: &dyn GlApi, operation: &'static str) -> Vec<GraphicsStateError> {
        std::iter::from_fn(|| gl.get_error())
            .take(MAX_DRAINED_ERRORS)
            .map(|code| GraphicsStateError { code, operation })
            .collect()
    }

    pub fn code_name(&self) -> &'static str {
        match self.code {
            0x0500 => "GL_INVALID_ENUM",
            0x0501 => "GL_INVALID_VALUE",
            0x0502 => "GL_INVALID_OPERATION",
            0x0505 => "GL_OUT_OF_MEMORY",
            0x0506 => "GL_INVALID_FRAMEBUFFER_OPERATION",
            0x0507 => "GL_CONTEXT_LOST",
            _ => "unknown",
        }
    }
}

impl fmt::Display for GraphicsStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: gl error 0x{:04X} ({})",
            self.operation,
            self.code,
            self.code_name()
        )
    }
}

impl std::error::Error for GraphicsStateError {}

/// Failure of a single draw call.
///
/// `Material` and `TargetMismatch` are raised before any GPU state is touched, so
/// the caller can skip or substitute the item and carry on.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    Material(MaterialPropertyError),
    TargetMismatch(TargetMismatchError),
    /// The renderer's program has been destroyed.
    Destroyed,
    Geometry(GeometryError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Material(err) => write!(f, "cannot resolve material: {err}"),
            RenderError::TargetMismatch(err) => write!(f, "{err}"),
            RenderError::Destroyed => write!(f, "renderer has been destroyed"),
            RenderError::Geometry(err) => write!(f, "cannot bind geometry: {err}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Material(err) => Some(err),
            RenderError::TargetMismatch(err) => Some(err),
            RenderError::Destroyed => None,
            RenderError::Geometry(err) => Some(err),
        }
    }
}

impl From<MaterialPropertyError> for RenderError {
    fn from(err: MaterialPropertyError) -> Self {
        RenderError::Material(err)
    }
}

impl From<TargetMismatchError> for RenderError {
    fn from(err: TargetMismatchError) -> Self {
        RenderError::TargetMismatch(err)
    }
}

impl From<GeometryError> for RenderError {
    fn from(err: GeometryError) -> Self {
        RenderError::Geometry(err)
    }
}
