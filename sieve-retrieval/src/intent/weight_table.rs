//! Intent → channel weight table, replaceable at runtime.
//!
//! A reload that fails to parse or validate leaves the current table in place.

use std::path::Path;
use std::sync::{PoisonError, RwLock};

use tracing::{info, warn};

use sieve_core::errors::ConfigError;
use sieve_core::intent::{ChannelWeights, Intent, WeightProfiles};

#[derive(Debug)]
pub struct WeightTable {
    profiles: RwLock<WeightProfiles>,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::new(WeightProfiles::default())
    }
}

impl WeightTable {
    pub fn new(profiles: WeightProfiles) -> Self {
        Self {
            profiles: RwLock::new(profiles),
        }
    }

    /// Weights for `intent` under the current table.
    pub fn get(&self, intent: Intent) -> ChannelWeights {
        self.profiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(intent)
    }

    pub fn snapshot(&self) -> WeightProfiles {
        self.profiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in a new table after validating it.
    pub fn replace(&self, profiles: WeightProfiles) -> Result<(), ConfigError> {
        profiles.validate()?;
        *self
            .profiles
            .write()
            .unwrap_or_else(PoisonError::into_inner) = profiles;
        Ok(())
    }

    /// Parse a TOML table with `[factual]`, `[keyword]`, `[exploratory]`
    /// and `[summary]` sections and swap it in.
    pub fn reload_from_str(&self, toml_str: &str, origin: &str) -> Result<(), ConfigError> {
        let profiles: WeightProfiles =
            toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;
        self.replace(profiles)
    }

    /// Hot reload from a file. On any error the previous table stays in effect.
    pub fn reload_from_file(&self, path: &Path) -> Result<(), ConfigError> {
        let origin = path.display().to_string();
        let result = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound {
                path: origin.clone(),
            })
            .and_then(|content| self.reload_from_str(&content, &origin));

        match &result {
            Ok(()) => info!(path = %origin, "intent weight table reloaded"),
            Err(e) => warn!(path = %origin, error = %e, "weight table reload rejected, keeping previous table"),
        }
        result
    }
}
