//! # sieve-observability
//!
//! Structured tracing with span definitions, channel degradation tracking
//! with recovery status, and a bounded query log with latency statistics.

pub mod degradation;
pub mod query_log;
pub mod tracing_setup;

pub use degradation::{DegradationTracker, RecoveryStatus, TrackedDegradation};
pub use query_log::{QueryLog, QueryLogEntry};
