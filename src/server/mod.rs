//! MCP server for the fuzzy index.
//!
//! Exposes indexing and search to MCP clients over stdio.

pub mod handlers;

pub use handlers::FuzzyIndexServer;

use anyhow::Result;
use rmcp::transport::io::stdio;
use rmcp::ServiceExt;

/// Run the server over stdio until the client disconnects.
pub async fn run_server(server: FuzzyIndexServer) -> Result<()> {
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
