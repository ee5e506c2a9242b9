//! Fuzzy Index Server - Main entry point
//!
//! Connects to the storage cluster, provisions the index table and serves the
//! index over MCP stdio.

use anyhow::Result;
use fuzzy_index_server::migration::{run_migrations, GuardSettings};
use fuzzy_index_server::observability::MetricsTracker;
use fuzzy_index_server::services::{SearchService, SearchServiceImpl};
use fuzzy_index_server::storage::{CqlIndexStore, IndexStore};
use fuzzy_index_server::{Config, FuzzyIndexServer};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // stderr only; stdout carries the MCP protocol
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(std::env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string()))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => {
            info!(log_level = %cfg.log_level, "Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let store = match CqlIndexStore::connect(&config).await {
        Ok(store) => Arc::new(store) as Arc<dyn IndexStore>,
        Err(e) => {
            error!("Failed to connect to storage: {}", e);
            return Err(e.into());
        }
    };

    // The compaction guard keeps running on its own task; its handle is not awaited
    let _guard = run_migrations(store.clone(), GuardSettings::default()).await?;

    let metrics = MetricsTracker::new();
    let service = Arc::new(SearchServiceImpl::from_config(
        store,
        &config,
        metrics.clone(),
    )) as Arc<dyn SearchService>;

    let server = FuzzyIndexServer::new(service);

    info!(
        keyspace = %config.keyspace,
        write_concurrency = config.write_concurrency,
        max_query_results = config.max_query_results,
        rate_limit_per_minute = config.rate_limit_per_minute,
        "Starting MCP server with stdio transport"
    );
    fuzzy_index_server::server::run_server(server).await?;

    info!("{}", metrics.summary());
    info!("Fuzzy Index Server shutdown complete");
    Ok(())
}
