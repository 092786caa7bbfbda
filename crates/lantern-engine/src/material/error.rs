use std::fmt;

use super::PropertyKind;

/// A material property could not be resolved to the requested type.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialPropertyError {
    /// No property with this name.
    Missing { name: String },
    /// The property exists but holds another kind of value.
    WrongKind {
        name: String,
        expected: PropertyKind,
        found: PropertyKind,
    },
}

impl MaterialPropertyError {
    /// Name of the offending property.
    pub fn name(&self) -> &str {
        match self {
            MaterialPropertyError::Missing { name } => name,
            MaterialPropertyError::WrongKind { name, .. } => name,
        }
    }
}

impl fmt::Display for MaterialPropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialPropertyError::Missing { name } => {
                write!(f, "material property '{name}' is missing")
            }
            MaterialPropertyError::WrongKind {
                name,
                expected,
                found,
            } => write!(
                f,
                "material property '{name}' is a {}, expected a {}",
                found.as_str(),
                expected.as_str()
            ),
        }
    }
}

impl std::error::Error for MaterialPropertyError {}
