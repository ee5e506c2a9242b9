//! Classification of the entity an index row points at.

use super::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of entity indexed by a row.
///
/// Stored as a CQL `int` and used as the second clustering column, so the
/// numeric codes are part of the on-disk format and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    #[default]
    Unknown,
    Contact,
    Conversation,
    Document,
}

impl EntryType {
    /// Storage code for this type.
    pub fn code(self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::Contact => 1,
            Self::Conversation => 2,
            Self::Document => 3,
        }
    }

    /// Decode a storage code. Codes written by a newer schema read back as `Unknown`.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Contact,
            2 => Self::Conversation,
            3 => Self::Document,
            _ => Self::Unknown,
        }
    }

    /// Lowercase name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Contact => "contact",
            Self::Conversation => "conversation",
            Self::Document => "document",
        }
    }
}

impl FromStr for EntryType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "unknown" => Ok(Self::Unknown),
            "contact" => Ok(Self::Contact),
            "conversation" => Ok(Self::Conversation),
            "document" => Ok(Self::Document),
            other => Err(ValidationError::UnknownEntryType(other.to_string())),
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
