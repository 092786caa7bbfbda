//! Lit-shader rendering.
//!
//! [`LitRenderer`] owns one [`ShaderProgram`] and draws [`RenderItem`]s through a
//! [`DrawStrategy`] fixed at construction.
//!
//! Convention:
//! - Matrices are uploaded column-major, untransposed, exactly as supplied.
//! - Material and texture checks run before the first GPU call of a draw.

mod error;
mod item;
mod lit;
mod program;
mod strategy;

pub use error::{
    CompileError, CompileStage, GraphicsStateError, ProgramError, RenderError, SymbolKind,
    SymbolNotFoundError, TargetMismatchError,
};
pub use item::{RenderItem, ViewTransforms};
pub use lit::{COLOR, LitRenderer, LitRendererConfig, MAIN_TEXTURE, OPACITY};
pub use program::{ShaderProgram, Slot};
pub use strategy::{DrawStrategy, StrategyPreference};
