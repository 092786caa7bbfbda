//! Material properties as seen by renderers.
//!
//! Renderers read materials through [`MaterialSource`]; [`MaterialStore`] is the
//! stock name-keyed implementation.

mod error;
mod store;
mod texture;

pub use error::MaterialPropertyError;
pub use store::{MaterialSource, MaterialStore, PropertyKind, PropertyValue};
pub use texture::TextureRef;

pub use crate::gl::TextureTarget;
