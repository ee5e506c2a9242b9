//! Counters for the ingest and query paths.
//!
//! The tracker is cheap to clone; every clone shares the same counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Process-wide counters for the index service.
#[derive(Debug, Clone)]
pub struct MetricsTracker {
    entries_indexed_total: Arc<AtomicU64>,
    rows_written_total: Arc<AtomicU64>,
    searches_total: Arc<AtomicU64>,
    candidates_scanned_total: Arc<AtomicU64>,
    storage_errors_total: Arc<AtomicU64>,
    rate_limited_total: Arc<AtomicU64>,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self {
            entries_indexed_total: Arc::new(AtomicU64::new(0)),
            rows_written_total: Arc::new(AtomicU64::new(0)),
            searches_total: Arc::new(AtomicU64::new(0)),
            candidates_scanned_total: Arc::new(AtomicU64::new(0)),
            storage_errors_total: Arc::new(AtomicU64::new(0)),
            rate_limited_total: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Track one indexed document and the rows it produced.
    pub fn track_ingest(&self, rows: usize, duration_ms: u128) {
        self.entries_indexed_total.fetch_add(1, Ordering::Relaxed);
        self.rows_written_total
            .fetch_add(rows as u64, Ordering::Relaxed);

        tracing::debug!(rows = rows, duration_ms = duration_ms, "Ingest completed");
    }

    /// Track a search query.
    pub fn track_search(&self, duration_ms: u128, result_count: usize) {
        self.searches_total.fetch_add(1, Ordering::Relaxed);

        tracing::info!(
            duration_ms = duration_ms,
            result_count = result_count,
            "Search query completed"
        );
    }

    /// Track rows pulled from storage before deduplication.
    pub fn track_candidates(&self, scanned: usize) {
        self.candidates_scanned_total
            .fetch_add(scanned as u64, Ordering::Relaxed);
    }

    pub fn track_storage_error(&self, operation: &str) {
        self.storage_errors_total.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(operation = %operation, "Storage operation failed");
    }

    pub fn track_rate_limited(&self, owner: &str) {
        self.rate_limited_total.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(owner = %owner, "Call rejected by rate limiter");
    }

    pub fn entries_indexed_total(&self) -> u64 {
        self.entries_indexed_total.load(Ordering::Relaxed)
    }

    pub fn rows_written_total(&self) -> u64 {
        self.rows_written_total.load(Ordering::Relaxed)
    }

    pub fn searches_total(&self) -> u64 {
        self.searches_total.load(Ordering::Relaxed)
    }

    pub fn candidates_scanned_total(&self) -> u64 {
        self.candidates_scanned_total.load(Ordering::Relaxed)
    }

    pub fn storage_errors_total(&self) -> u64 {
        self.storage_errors_total.load(Ordering::Relaxed)
    }

    pub fn rate_limited_total(&self) -> u64 {
        self.rate_limited_total.load(Ordering::Relaxed)
    }

    /// Average rows written per indexed document.
    pub fn rows_per_entry(&self) -> f64 {
        let entries = self.entries_indexed_total();
        if entries == 0 {
            0.0
        } else {
            self.rows_written_total() as f64 / entries as f64
        }
    }

    /// Render all counters as a multi-line summary.
    pub fn summary(&self) -> String {
        format!(
            "Metrics Summary:\n\
             Entries Indexed: {}\n\
             Rows Written: {} ({:.2} per entry)\n\
             Searches: {}\n\
             Candidates Scanned: {}\n\
             Storage Errors: {}\n\
             Rate Limited: {}",
            self.entries_indexed_total(),
            self.rows_written_total(),
            self.rows_per_entry(),
            self.searches_total(),
            self.candidates_scanned_total(),
            self.storage_errors_total(),
            self.rate_limited_total(),
        )
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// A timer for tracking operation duration.
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    pub fn new(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Elapsed milliseconds so far.
    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }

    /// Finish the timer with a status and return the elapsed milliseconds.
    pub fn finish_with_status(self, success: bool) -> u128 {
        let duration_ms = self.elapsed_ms();

        if success {
            tracing::debug!(
                operation = %self.operation,
                duration_ms = duration_ms,
                "Operation succeeded"
            );
        } else {
            tracing::warn!(
                operation = %self.operation,
                duration_ms = duration_ms,
                "Operation failed"
            );
        }

        duration_ms
    }
}
