//! Lantern engine crate.
//!
//! Textured, lit mesh rendering over an OpenGL-style context. GPU access goes
//! through [`gl::GlApi`]; with the default `glow` feature, [`gl::GlowContext`]
//! drives a real context.

pub mod gl;
pub mod logging;
pub mod material;
pub mod mesh;
pub mod render;
