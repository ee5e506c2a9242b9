//! Fuzzy search over the inverted index.
//!
//! - **normalizer**: word tokens and the canonical comparison form
//! - **ranking**: edit-distance scoring of candidates
//! - **writer**: document ingestion, one row per distinct token
//! - **query_engine**: parallel prefix scans, merge, rank, top-K

pub mod normalizer;
pub mod query_engine;
pub mod ranking;
pub mod writer;

pub use normalizer::{distinct_tokens, normalize_text, normalize_word, tokenize};
pub use query_engine::{CandidateSet, QueryEngine, DEFAULT_MAX_RESULTS};
pub use ranking::levenshtein_distance;
pub use writer::{IndexWriter, DEFAULT_WRITE_CONCURRENCY};
