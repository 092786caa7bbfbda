use crate::gl::{TextureHandle, TextureTarget};

/// Borrowed reference to an uploaded texture.
///
/// The texture manager owns the GPU object; holders of a `TextureRef` may bind it
/// but never delete it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureRef {
    handle: TextureHandle,
    target: TextureTarget,
}

impl TextureRef {
    #[inline]
    pub const fn new(handle: TextureHandle, target: TextureTarget) -> Self {
        Self { handle, target }
    }

    #[inline]
    pub const fn handle(self) -> TextureHandle {
        self.handle
    }

    #[inline]
    pub const fn target(self) -> TextureTarget {
        self.target
    }
}
