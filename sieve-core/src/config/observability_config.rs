use serde::{Deserialize, Serialize};

use super::defaults;

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub query_log_capacity: usize,
    /// Queries slower than this are logged at `warn`.
    pub slow_query_ms: u64,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::DEFAULT_LOG_LEVEL.to_string(),
            query_log_capacity: defaults::DEFAULT_QUERY_LOG_CAPACITY,
            slow_query_ms: defaults::DEFAULT_SLOW_QUERY_MS,
        }
    }
}
