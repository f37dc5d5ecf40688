use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{ChannelKind, ChannelStatus};
use crate::intent::IntentProfile;

/// One fused document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionCandidate {
    pub doc_id: String,
    pub fused_score: f64,
    pub contributing_channels: BTreeSet<ChannelKind>,
    pub per_channel_rank: BTreeMap<ChannelKind, usize>,
    pub community_id: Option<String>,
}

impl FusionCandidate {
    /// Human-readable provenance, e.g. `dense#1 sparse#2`.
    pub fn explain(&self) -> String {
        self.per_channel_rank
            .iter()
            .map(|(kind, rank)| format!("{kind}#{rank}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// How a retrieval ended, from the caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalOutcome {
    Answered,
    Degraded,
    NoResults,
}

/// Non-fatal conditions observed while answering a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// At least one active channel failed, timed out, saturated or was cancelled.
    pub partial_degradation: bool,
    pub no_results: bool,
    pub intent: IntentProfile,
    pub channels: BTreeMap<ChannelKind, ChannelStatus>,
    pub elapsed_ms: u64,
}

impl Diagnostics {
    pub fn failed_channels(&self) -> Vec<ChannelKind> {
        self.channels
            .iter()
            .filter(|(_, s)| s.is_degraded())
            .map(|(k, _)| *k)
            .collect()
    }

    pub fn outcome(&self) -> RetrievalOutcome {
        if self.no_results {
            RetrievalOutcome::NoResults
        } else if self.partial_degradation {
            RetrievalOutcome::Degraded
        } else {
            RetrievalOutcome::Answered
        }
    }
}

/// Final ranked output of `retrieve`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionResult {
    pub items: Vec<FusionCandidate>,
    pub diagnostics: Diagnostics,
}

impl FusionResult {
    pub fn doc_ids(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.doc_id.as_str()).collect()
    }
}
