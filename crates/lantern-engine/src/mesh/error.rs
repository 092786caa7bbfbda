use std::fmt;

/// Invalid geometry data, or a GPU buffer that could not be allocated for it.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A per-vertex array does not have one entry per position.
    LengthMismatch {
        attribute: &'static str,
        expected: usize,
        found: usize,
    },
    /// An index points past the last vertex.
    IndexOutOfRange { index: u16, vertex_count: usize },
    /// Triangle-list indices must come in threes.
    IncompleteTriangle { index_count: usize },
    /// The driver refused to create a buffer or vertex array.
    Allocation { what: &'static str, details: String },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::LengthMismatch {
                attribute,
                expected,
                found,
            } => write!(
                f,
                "{attribute} array has {found} entries, expected {expected} (one per position)"
            ),
            GeometryError::IndexOutOfRange {
                index,
                vertex_count,
            } => write!(f, "index {index} out of range for {vertex_count} vertices"),
            GeometryError::IncompleteTriangle { index_count } => {
                write!(f, "{index_count} indices do not form whole triangles")
            }
            GeometryError::Allocation { what, details } => {
                write!(f, "failed to allocate {what}: {details}")
            }
        }
    }
}

impl std::error::Error for GeometryError {}
