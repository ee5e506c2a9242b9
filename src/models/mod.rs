//! Data models for index rows and query hits.

pub mod index_entry;

pub use index_entry::{IndexEntry, QueryHit, RowKey};
