//! Fuzzy Index Server - per-owner fuzzy text search on a wide-column store.
//!
//! Short texts (names, titles, phrases) are indexed under an owner and a
//! reference id, one row per distinct normalized word. A query fans out one
//! prefix scan per word, merges the candidates and ranks them by edit
//! distance to the whole query.
//!
//! # Architecture
//!
//! - **domain**: Validated identifiers and the entry type
//! - **models**: Index rows and query hits
//! - **error**: Error types per layer
//! - **config**: Configuration from environment variables
//! - **storage**: The `IndexStore` seam with CQL and in-memory backends
//! - **migration**: Table provisioning and the background compaction guard
//! - **search**: Normalizer, ranking, index writer and query engine
//! - **ratelimit**: Per-owner sliding-window limiter
//! - **services**: Validation, limiting and metrics in front of the core
//! - **observability**: Counters and timing
//! - **server**: MCP protocol server

pub mod config;
pub mod domain;
pub mod error;
pub mod migration;
pub mod models;
pub mod observability;
pub mod ratelimit;
pub mod search;
pub mod server;
pub mod services;
pub mod storage;

pub use config::Config;
pub use domain::{EntryType, OwnerId, ReferenceId};
pub use error::{ConfigError, IndexError, ServiceError, StoreError};
pub use models::{IndexEntry, QueryHit};
pub use search::{IndexWriter, QueryEngine};
pub use server::FuzzyIndexServer;
pub use storage::{CqlIndexStore, InMemoryIndexStore, IndexStore};
