//! Startup provisioning of the index schema.
//!
//! [`run_migrations`] is the single place that creates the table. Table
//! creation is fatal on failure; the compaction guard that follows runs on
//! its own task and only ever logs.

pub mod compaction_guard;

pub use compaction_guard::{CompactionGuard, CompactionOutcome, GuardSettings};

use crate::error::IndexResult;
use crate::storage::{schema, IndexStore};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Create the index table, then start the compaction guard in the background.
///
/// Returns the guard's handle so callers (and tests) can await its outcome;
/// dropping the handle leaves the guard running detached.
pub async fn run_migrations(
    store: Arc<dyn IndexStore>,
    settings: GuardSettings,
) -> IndexResult<JoinHandle<CompactionOutcome>> {
    schema::ensure_schema(store.as_ref()).await?;

    let handle = tokio::spawn(async move {
        let outcome = CompactionGuard::new(settings).run(store.as_ref()).await;
        log_outcome(&outcome);
        outcome
    });

    Ok(handle)
}

fn log_outcome(outcome: &CompactionOutcome) {
    match outcome {
        CompactionOutcome::AlreadyLeveled => {
            tracing::debug!("Search index already uses leveled compaction");
        }
        CompactionOutcome::Altered { previous } => {
            tracing::info!(previous = %previous, "Switched search index to leveled compaction");
        }
        CompactionOutcome::TimedOut { attempts } => {
            tracing::warn!(
                attempts,
                "Schema catalog never listed the search index; keeping default compaction"
            );
        }
        CompactionOutcome::Failed { reason } => {
            tracing::warn!(reason = %reason, "Compaction check skipped");
        }
    }
}
