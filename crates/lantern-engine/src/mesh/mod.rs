//! Mesh geometry and its cached GPU vertex arrays.

mod error;
mod geometry;

pub use error::GeometryError;
pub use geometry::{AttributeLocations, GeometryBuffer, TexCoords};
