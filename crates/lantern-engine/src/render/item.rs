use glam::Mat4;

use crate::material::MaterialSource;
use crate::mesh::GeometryBuffer;

/// Per-draw transforms, computed by the caller.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewTransforms {
    pub model_view: Mat4,
    /// Inverse-transpose of `model_view`, for normals.
    pub model_view_inverse_transpose: Mat4,
    pub model_view_projection: Mat4,
}

impl ViewTransforms {
    #[inline]
    pub const fn new(
        model_view: Mat4,
        model_view_inverse_transpose: Mat4,
        model_view_projection: Mat4,
    ) -> Self {
        Self {
            model_view,
            model_view_inverse_transpose,
            model_view_projection,
        }
    }
}

impl Default for ViewTransforms {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY)
    }
}

/// One mesh + one material for a single draw. Borrows both.
///
/// The geometry is borrowed mutably because its vertex array is built lazily.
pub struct RenderItem<'a> {
    pub geometry: &'a mut GeometryBuffer,
    pub material: &'a dyn MaterialSource,
}

impl<'a> RenderItem<'a> {
    #[inline]
    pub fn new(geometry: &'a mut GeometryBuffer, material: &'a dyn MaterialSource) -> Self {
        Self { geometry, material }
    }
}
