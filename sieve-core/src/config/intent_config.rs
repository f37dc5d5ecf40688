use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::intent::{Intent, WeightProfiles};

/// Per-intent overall query deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentDeadlines {
    pub factual_ms: u64,
    pub keyword_ms: u64,
    pub exploratory_ms: u64,
    pub summary_ms: u64,
}

impl Default for IntentDeadlines {
    fn default() -> Self {
        Self {
            factual_ms: defaults::DEFAULT_FACTUAL_DEADLINE_MS,
            keyword_ms: defaults::DEFAULT_KEYWORD_DEADLINE_MS,
            exploratory_ms: defaults::DEFAULT_EXPLORATORY_DEADLINE_MS,
            summary_ms: defaults::DEFAULT_SUMMARY_DEADLINE_MS,
        }
    }
}

impl IntentDeadlines {
    pub fn for_intent(&self, intent: Intent) -> Duration {
        let ms = match intent {
            Intent::Factual => self.factual_ms,
            Intent::Keyword => self.keyword_ms,
            Intent::Exploratory => self.exploratory_ms,
            Intent::Summary => self.summary_ms,
        };
        Duration::from_millis(ms)
    }
}

/// Intent classification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentConfig {
    /// Hard timeout on the intent model call.
    pub model_timeout_ms: u64,
    /// Max cached classifications.
    pub cache_capacity: u64,
    /// Optional TOML file overriding `weights`, reloadable at runtime.
    pub weights_path: Option<String>,
    pub weights: WeightProfiles,
    pub deadlines: IntentDeadlines,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            model_timeout_ms: defaults::DEFAULT_MODEL_TIMEOUT_MS,
            cache_capacity: defaults::DEFAULT_INTENT_CACHE_SIZE,
            weights_path: None,
            weights: WeightProfiles::default(),
            deadlines: IntentDeadlines::default(),
        }
    }
}
