//! Application service layer.
//!
//! Services sit between the MCP handlers and the index core: they validate
//! input, enforce the per-owner rate limit and keep metrics.

mod search_service;

pub use search_service::{IndexTextParams, SearchService, SearchServiceImpl};
