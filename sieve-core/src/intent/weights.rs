use serde::{Deserialize, Serialize};

use super::Intent;
use crate::errors::ConfigError;
use crate::models::ChannelKind;

/// Per-channel fusion weights. Weights need not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelWeights {
    pub dense: f64,
    pub sparse: f64,
    pub graph_local: f64,
    pub graph_global: f64,
}

impl ChannelWeights {
    /// Equal weight on every channel. Used when classification fails outright.
    pub const UNIFORM: ChannelWeights = ChannelWeights {
        dense: 0.25,
        sparse: 0.25,
        graph_local: 0.25,
        graph_global: 0.25,
    };

    pub const fn new(dense: f64, sparse: f64, graph_local: f64, graph_global: f64) -> Self {
        Self {
            dense,
            sparse,
            graph_local,
            graph_global,
        }
    }

    pub fn get(&self, kind: ChannelKind) -> f64 {
        match kind {
            ChannelKind::Dense => self.dense,
            ChannelKind::Sparse => self.sparse,
            ChannelKind::GraphLocal => self.graph_local,
            ChannelKind::GraphGlobal => self.graph_global,
        }
    }

    pub fn set(&mut self, kind: ChannelKind, weight: f64) {
        match kind {
            ChannelKind::Dense => self.dense = weight,
            ChannelKind::Sparse => self.sparse = weight,
            ChannelKind::GraphLocal => self.graph_local = weight,
            ChannelKind::GraphGlobal => self.graph_global = weight,
        }
    }

    pub fn total(&self) -> f64 {
        ChannelKind::ALL.iter().map(|k| self.get(*k)).sum()
    }

    /// Channels with a strictly positive weight.
    pub fn active_channels(&self) -> impl Iterator<Item = ChannelKind> + '_ {
        ChannelKind::ALL
            .into_iter()
            .filter(move |k| self.get(*k) > 0.0)
    }

    /// Reject negative or non-finite weights.
    pub fn validate(&self, field: &str) -> Result<(), ConfigError> {
        for kind in ChannelKind::ALL {
            let w = self.get(kind);
            if !w.is_finite() || w < 0.0 {
                return Err(ConfigError::ValidationFailed {
                    field: format!("{field}.{}", kind.label()),
                    message: format!("weight must be finite and >= 0, got {w}"),
                });
            }
        }
        Ok(())
    }

    /// Weights rescaled so the surviving channels keep the original total mass.
    ///
    /// Channels not in `surviving` drop to zero. Every surviving weight is
    /// multiplied by the same factor, so relative order among documents
    /// ranked only by survivors does not change.
    pub fn renormalized(&self, surviving: &[ChannelKind]) -> ChannelWeights {
        let total = self.total();
        let kept: f64 = surviving.iter().map(|k| self.get(*k)).sum();
        let mut out = ChannelWeights::new(0.0, 0.0, 0.0, 0.0);
        if kept <= 0.0 {
            return out;
        }
        let factor = total / kept;
        for kind in surviving {
            out.set(*kind, self.get(*kind) * factor);
        }
        out
    }
}

/// Built-in weight profile for an intent, as (dense, sparse, graph-local, graph-global).
pub fn default_weights(intent: Intent) -> ChannelWeights {
    match intent {
        Intent::Factual => ChannelWeights::new(0.3, 0.3, 0.4, 0.0),
        Intent::Keyword => ChannelWeights::new(0.1, 0.6, 0.3, 0.0),
        Intent::Exploratory => ChannelWeights::new(0.2, 0.1, 0.2, 0.5),
        Intent::Summary => ChannelWeights::new(0.1, 0.0, 0.1, 0.8),
    }
}

/// The full intent → weights table. Serialized with one TOML section per intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightProfiles {
    pub factual: ChannelWeights,
    pub keyword: ChannelWeights,
    pub exploratory: ChannelWeights,
    pub summary: ChannelWeights,
}

impl Default for WeightProfiles {
    fn default() -> Self {
        Self {
            factual: default_weights(Intent::Factual),
            keyword: default_weights(Intent::Keyword),
            exploratory: default_weights(Intent::Exploratory),
            summary: default_weights(Intent::Summary),
        }
    }
}

impl WeightProfiles {
    pub fn get(&self, intent: Intent) -> ChannelWeights {
        match intent {
            Intent::Factual => self.factual,
            Intent::Keyword => self.keyword,
            Intent::Exploratory => self.exploratory,
            Intent::Summary => self.summary,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for intent in Intent::ALL {
            self.get(intent)
                .validate(&format!("intent.weights.{}", intent.as_str()))?;
        }
        Ok(())
    }
}

/// Where a profile's intent came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSource {
    Model,
    Heuristic,
    Cache,
    Uniform,
}

/// Output of intent classification. Produced once per query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentProfile {
    pub intent: Intent,
    pub confidence: f64,
    pub weights: ChannelWeights,
    pub source: ProfileSource,
}

impl IntentProfile {
    /// Profile used when neither the model nor the heuristic produced a label.
    pub fn uniform() -> Self {
        Self {
            intent: Intent::Factual,
            confidence: 0.0,
            weights: ChannelWeights::UNIFORM,
            source: ProfileSource::Uniform,
        }
    }
}
