//! Post-creation compaction maintenance.
//!
//! The metadata catalog may not list a freshly created table on every node
//! right away. The guard polls it for a bounded time and, once the table is
//! visible, switches it to leveled compaction. It never fails: every path
//! ends in a [`CompactionOutcome`] the caller can log.

use crate::storage::schema::{is_leveled, LEVELED_COMPACTION, TABLE_NAME};
use crate::storage::IndexStore;
use std::time::Duration;

/// Polling budget for the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardSettings {
    /// Catalog lookups before giving up
    pub attempts: u32,

    /// Pause between lookups
    pub interval: Duration,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            attempts: 6,
            interval: Duration::from_millis(500),
        }
    }
}

/// Result of one guard run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompactionOutcome {
    /// Table already uses leveled compaction
    AlreadyLeveled,

    /// Table was switched from `previous` to leveled compaction
    Altered { previous: String },

    /// Catalog never listed the table within the budget
    TimedOut { attempts: u32 },

    /// Lookup or alteration failed
    Failed { reason: String },
}

impl CompactionOutcome {
    /// Whether the table is known to be on leveled compaction afterwards.
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::AlreadyLeveled | Self::Altered { .. })
    }
}

/// Best-effort switch of the index table to leveled compaction.
pub struct CompactionGuard {
    settings: GuardSettings,
}

impl CompactionGuard {
    pub fn new(settings: GuardSettings) -> Self {
        Self { settings }
    }

    /// Poll the catalog and align the compaction strategy.
    ///
    /// Blocks the calling task for at most `attempts - 1` intervals plus the
    /// lookups themselves. Run it off the request path.
    pub async fn run(&self, store: &dyn IndexStore) -> CompactionOutcome {
        let Some(keyspace) = store.keyspace() else {
            return CompactionOutcome::Failed {
                reason: "no keyspace context".to_string(),
            };
        };

        let mut current = None;
        for attempt in 1..=self.settings.attempts {
            match store.compaction_class().await {
                Ok(Some(class)) => {
                    current = Some(class);
                    break;
                }
                Ok(None) => {
                    tracing::debug!(
                        keyspace,
                        table = TABLE_NAME,
                        attempt,
                        "Table not yet visible in schema catalog"
                    );
                }
                Err(e) => {
                    return CompactionOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            }

            if attempt < self.settings.attempts {
                tokio::time::sleep(self.settings.interval).await;
            }
        }

        let Some(previous) = current else {
            return CompactionOutcome::TimedOut {
                attempts: self.settings.attempts,
            };
        };

        if is_leveled(&previous) {
            return CompactionOutcome::AlreadyLeveled;
        }

        match store.set_compaction(LEVELED_COMPACTION).await {
            Ok(()) => CompactionOutcome::Altered { previous },
            Err(e) => CompactionOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }
}

impl Default for CompactionGuard {
    fn default() -> Self {
        Self::new(GuardSettings::default())
    }
}
