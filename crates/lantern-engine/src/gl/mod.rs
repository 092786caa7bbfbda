//! Graphics-context seam.
//!
//! Everything the renderer does to the GPU goes through [`GlApi`]. The production
//! implementation wraps a `glow` context; tests substitute a recording context so
//! state-ordering invariants can be checked without a driver.

mod api;
mod types;

#[cfg(all(feature = "glow", not(target_arch = "wasm32")))]
mod glow_backend;

#[cfg(test)]
pub(crate) mod recording;

pub use api::GlApi;
pub use types::{
    AttribLocation, AttribSource, BufferHandle, BufferTarget, IndexFormat, IndexSource,
    PrimitiveTopology, ProgramHandle, ShaderHandle, ShaderStage, TextureHandle, TextureTarget,
    UniformLocation, VertexArrayHandle,
};

#[cfg(all(feature = "glow", not(target_arch = "wasm32")))]
pub use glow_backend::GlowContext;
