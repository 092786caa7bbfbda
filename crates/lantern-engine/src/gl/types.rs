use std::num::NonZeroU32;

// ── object handles ────────────────────────────────────────────────────────

/// Linked GPU program object.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub NonZeroU32);

/// Compiled (not yet linked) shader stage object.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub NonZeroU32);

/// Vertex or index buffer object.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub NonZeroU32);

/// Vertex array object (attribute layout + bound buffers).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct VertexArrayHandle(pub NonZeroU32);

/// Texture object. Owned by whoever uploaded it; the renderer only binds it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub NonZeroU32);

/// Generic vertex attribute index inside a linked program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AttribLocation(pub u32);

/// Uniform location inside a linked program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

// ── enums ─────────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn as_str(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Per-vertex attribute data.
    Array,
    /// Index data.
    ElementArray,
}

/// Texture dimensionality/topology a sampler is bound to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    Texture2D,
    CubeMap,
    /// Externally produced image (camera/video surface, `GL_TEXTURE_EXTERNAL_OES`).
    External,
}

impl TextureTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            TextureTarget::Texture2D => "2d",
            TextureTarget::CubeMap => "cube-map",
            TextureTarget::External => "external",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    TriangleList,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum IndexFormat {
    Uint16,
}

// ── data sources ──────────────────────────────────────────────────────────

/// Where an attribute pointer reads its floats from.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AttribSource<'a> {
    /// Byte offset into the currently bound `BufferTarget::Array` buffer.
    Buffer { offset: usize },
    /// CPU-resident array, tightly packed.
    Client(&'a [f32]),
}

/// Where an indexed draw reads its indices from.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum IndexSource<'a> {
    /// Byte offset into the currently bound `BufferTarget::ElementArray` buffer.
    Buffer { offset: usize },
    /// CPU-resident index array.
    Client(&'a [u16]),
}
