//! Storage layer for the inverted index.
//!
//! [`IndexStore`] is the seam between the index core and the wide-column
//! cluster. [`CqlIndexStore`] talks CQL to a real cluster; [`InMemoryIndexStore`]
//! reproduces the same partition and clustering semantics in process.

mod cql_store;
mod memory_store;
pub mod schema;
mod traits;

pub use cql_store::CqlIndexStore;
pub use memory_store::{CatalogVisibility, InMemoryIndexStore};
pub use traits::IndexStore;
