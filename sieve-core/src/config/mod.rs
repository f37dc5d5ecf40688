pub mod channel_config;
pub mod defaults;
pub mod embedding_config;
pub mod fusion_config;
pub mod intent_config;
pub mod observability_config;
pub mod storage_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use channel_config::ChannelConfig;
pub use embedding_config::EmbeddingConfig;
pub use fusion_config::FusionConfig;
pub use intent_config::{IntentConfig, IntentDeadlines};
pub use observability_config::ObservabilityConfig;
pub use storage_config::StorageConfig;

use crate::errors::ConfigError;
use crate::intent::Intent;

/// Top-level configuration aggregating all subsystem configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`SIEVE_*`)
/// 2. Config file passed to `load`
/// 3. Compiled defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SieveConfig {
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub intent: IntentConfig,
    pub channels: ChannelConfig,
    pub fusion: FusionConfig,
    pub observability: ObservabilityConfig,
}

impl SieveConfig {
    /// Load from an optional TOML file, apply env overrides, validate.
    /// A missing file falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) if p.exists() => {
                let content =
                    std::fs::read_to_string(p).map_err(|_| ConfigError::FileNotFound {
                        path: p.display().to_string(),
                    })?;
                toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                    path: p.display().to_string(),
                    message: e.to_string(),
                })?
            }
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML string. Does not validate.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Apply `SIEVE_*` overrides read through `lookup`.
    /// Values that fail to parse are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SIEVE_RRF_K").and_then(|v| v.parse::<f64>().ok()) {
            self.fusion.rrf_k = v;
        }
        if let Some(v) = lookup("SIEVE_DB_PATH") {
            self.storage.db_path = Some(v);
        }
        if let Some(v) = lookup("SIEVE_LOG_LEVEL") {
            self.observability.log_level = v;
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fusion.rrf_k.is_finite() || self.fusion.rrf_k <= 0.0 {
            return Err(invalid("fusion.rrf_k", "must be finite and > 0"));
        }
        if self.fusion.default_top_n == 0 || self.fusion.default_top_n > crate::constants::MAX_TOP_N
        {
            return Err(invalid(
                "fusion.default_top_n",
                &format!("must be in 1..={}", crate::constants::MAX_TOP_N),
            ));
        }
        if self.fusion.max_query_chars == 0 {
            return Err(invalid("fusion.max_query_chars", "must be greater than 0"));
        }
        self.intent.weights.validate()?;
        for intent in Intent::ALL {
            if self.intent.deadlines.for_intent(intent).is_zero() {
                return Err(invalid(
                    &format!("intent.deadlines.{}_ms", intent.as_str()),
                    "must be greater than 0",
                ));
            }
        }
        if self.intent.model_timeout_ms == 0 {
            return Err(invalid("intent.model_timeout_ms", "must be greater than 0"));
        }
        let fraction = self.channels.timeout_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(invalid("channels.timeout_fraction", "must be in (0, 1]"));
        }
        if self.channels.max_concurrency == 0 {
            return Err(invalid("channels.max_concurrency", "must be at least 1"));
        }
        if self.channels.top_k == 0 || self.channels.top_k > crate::constants::MAX_CHANNEL_TOP_K {
            return Err(invalid(
                "channels.top_k",
                &format!("must be in 1..={}", crate::constants::MAX_CHANNEL_TOP_K),
            ));
        }
        if self.embedding.dimensions == 0 {
            return Err(invalid("embedding.dimensions", "must be at least 1"));
        }
        if self.embedding.sparse_buckets == 0 {
            return Err(invalid("embedding.sparse_buckets", "must be at least 1"));
        }
        if self.storage.read_pool_size == 0 {
            return Err(invalid("storage.read_pool_size", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
