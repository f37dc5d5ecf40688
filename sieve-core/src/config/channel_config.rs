use serde::{Deserialize, Serialize};

use super::defaults;

/// Channel execution configuration: fan-out limits, backpressure and retries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Candidates requested from each channel.
    pub top_k: usize,
    /// Outstanding backend requests allowed per channel.
    pub max_concurrency: usize,
    /// How long a request waits for a permit before `Saturated`.
    pub queue_timeout_ms: u64,
    pub retry_backoff_ms: u64,
    pub max_retries: u32,
    /// Per-channel soft timeout as a fraction of the query deadline.
    pub timeout_fraction: f64,
    /// Communities expanded by the graph-global channel.
    pub global_top_communities: usize,
    /// Do not run channels whose weight is zero for the query's intent.
    /// They report `Skipped` instead.
    pub skip_zero_weight: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            top_k: defaults::DEFAULT_CHANNEL_TOP_K,
            max_concurrency: defaults::DEFAULT_MAX_CONCURRENCY,
            queue_timeout_ms: defaults::DEFAULT_QUEUE_TIMEOUT_MS,
            retry_backoff_ms: defaults::DEFAULT_RETRY_BACKOFF_MS,
            max_retries: defaults::DEFAULT_MAX_RETRIES,
            timeout_fraction: defaults::DEFAULT_TIMEOUT_FRACTION,
            global_top_communities: defaults::DEFAULT_GLOBAL_TOP_COMMUNITIES,
            skip_zero_weight: defaults::DEFAULT_SKIP_ZERO_WEIGHT_CHANNELS,
        }
    }
}
