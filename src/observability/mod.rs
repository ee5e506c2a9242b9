//! Observability module: counters and operation timing.
//!
//! Logging itself goes through `tracing`; this module only keeps the
//! process-wide counters the service reports.

pub mod metrics;

pub use metrics::{MetricsTracker, Timer};
