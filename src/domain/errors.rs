//! Domain validation errors.

use std::fmt;

/// Errors that can occur during domain value object validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided identifier is empty or whitespace.
    EmptyId,

    /// The provided entry type name is not recognised.
    UnknownEntryType(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "ID cannot be empty"),
            Self::UnknownEntryType(name) => write!(f, "Unknown entry type: {}", name),
        }
    }
}

impl std::error::Error for ValidationError {}
