//! Domain value objects and types.
//!
//! Type-safe wrappers for the identifiers that key the index. These value
//! objects validate at construction time so an empty owner or reference can
//! never reach storage.

pub mod entry_type;
pub mod errors;
pub mod ids;

pub use entry_type::EntryType;
pub use errors::ValidationError;
pub use ids::{OwnerId, ReferenceId};
