//! Tracing setup: structured JSON logging, span macros and event helpers.

pub mod events;
pub mod spans;

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber with structured JSON output.
///
/// Respects the `SIEVE_LOG` environment variable for filtering, falling
/// back to `default_level` (usually `observability.log_level`).
/// A second call is a no-op.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_env("SIEVE_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .json()
        .try_init();
}

/// Initialize tracing with a custom filter string (for tests or embedding).
pub fn init_tracing_with_filter(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(true)
        .json()
        .try_init();
}
