use serde::{Deserialize, Serialize};

use super::defaults;

/// Rank fusion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// RRF smoothing constant. Must be > 0.
    pub rrf_k: f64,
    pub default_top_n: usize,
    /// Rescale weights over surviving channels when some degrade.
    pub renormalize_on_degradation: bool,
    pub max_query_chars: usize,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            rrf_k: defaults::DEFAULT_RRF_K,
            default_top_n: defaults::DEFAULT_TOP_N,
            renormalize_on_degradation: defaults::DEFAULT_RENORMALIZE_ON_DEGRADATION,
            max_query_chars: defaults::DEFAULT_MAX_QUERY_CHARS,
        }
    }
}
