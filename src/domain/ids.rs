//! Owner and reference identifier value objects.

use super::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier, rejecting empty or whitespace-only input.
            ///
            /// # Errors
            ///
            /// Returns `ValidationError::EmptyId` if the provided ID is blank.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::EmptyId);
                }
                Ok(Self(id))
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Convert into the underlying String.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                self.0.serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $name::new(s).map_err(serde::de::Error::custom)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of the tenant whose rows live in one storage partition.
    ///
    /// Every read and write is scoped to exactly one owner.
    ///
    /// # Example
    ///
    /// ```
    /// use fuzzy_index_server::domain::OwnerId;
    ///
    /// let owner = OwnerId::new("user_42").unwrap();
    /// assert_eq!(owner.as_str(), "user_42");
    /// ```
    OwnerId
);

string_id!(
    /// Opaque identifier of the entity an index row points back to.
    ///
    /// Some producers embed timestamps here; any such formatting is the
    /// producer's business and is never interpreted.
    ReferenceId
);
