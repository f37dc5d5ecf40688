use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::Embedding;

/// The four retrieval channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    Dense,
    Sparse,
    GraphLocal,
    GraphGlobal,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 4] = [
        Self::Dense,
        Self::Sparse,
        Self::GraphLocal,
        Self::GraphGlobal,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dense => "dense",
            Self::Sparse => "sparse",
            Self::GraphLocal => "graph_local",
            Self::GraphGlobal => "graph_global",
        }
    }

    /// Whether the channel consumes the query embedding.
    pub fn needs_embedding(&self) -> bool {
        matches!(self, Self::Dense | Self::Sparse)
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One ranked document inside a channel result. Ranks are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedDoc {
    pub doc_id: String,
    pub rank: usize,
    /// Community the document was reached through (graph-global only).
    pub community_id: Option<String>,
}

/// Ranked output of one channel, deduplicated and ordered by rank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelResult {
    docs: Vec<RankedDoc>,
}

impl ChannelResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from explicit `(doc_id, rank)` pairs.
    ///
    /// Duplicates keep their best (smallest) rank. Output is sorted by rank,
    /// then doc id.
    pub fn from_ranked<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let mut best: HashMap<String, usize> = HashMap::new();
        for (doc_id, rank) in pairs {
            let rank = rank.max(1);
            best.entry(doc_id.into())
                .and_modify(|r| *r = (*r).min(rank))
                .or_insert(rank);
        }
        let mut docs: Vec<RankedDoc> = best
            .into_iter()
            .map(|(doc_id, rank)| RankedDoc {
                doc_id,
                rank,
                community_id: None,
            })
            .collect();
        docs.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.doc_id.cmp(&b.doc_id)));
        Self { docs }
    }

    /// Build from an already ordered list; ranks are assigned 1, 2, 3...
    /// Later duplicates are dropped.
    pub fn from_ordered<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_tagged(ids.into_iter().map(|id| (id, None)))
    }

    /// Ordered list where each document may carry a community tag.
    pub fn from_tagged<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<String>)>,
        S: Into<String>,
    {
        let mut seen = std::collections::HashSet::new();
        let mut docs = Vec::new();
        for (doc_id, community_id) in items {
            let doc_id = doc_id.into();
            if !seen.insert(doc_id.clone()) {
                continue;
            }
            docs.push(RankedDoc {
                doc_id,
                rank: docs.len() + 1,
                community_id,
            });
        }
        Self { docs }
    }

    pub fn rank_of(&self, doc_id: &str) -> Option<usize> {
        self.docs.iter().find(|d| d.doc_id == doc_id).map(|d| d.rank)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedDoc> {
        self.docs.iter()
    }

    pub fn doc_ids(&self) -> Vec<&str> {
        self.docs.iter().map(|d| d.doc_id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Keep only the first `k` documents.
    pub fn truncate(&mut self, k: usize) {
        self.docs.truncate(k);
    }
}

/// Outcome of one channel for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChannelStatus {
    Ok { hits: usize },
    /// Weight was zero for this intent; the channel was not run.
    Skipped,
    TimedOut { timeout_ms: u64 },
    Failed { reason: String },
    Saturated,
    Cancelled,
}

impl fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok { hits } => write!(f, "ok ({hits} hits)"),
            Self::Skipped => f.write_str("skipped"),
            Self::TimedOut { timeout_ms } => write!(f, "timed out after {timeout_ms}ms"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
            Self::Saturated => f.write_str("saturated"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

impl ChannelStatus {
    /// Failed, timed out, saturated or cancelled.
    pub fn is_degraded(&self) -> bool {
        !matches!(self, Self::Ok { .. } | Self::Skipped)
    }
}

/// Everything a channel executor needs for one query.
#[derive(Debug, Clone)]
pub struct ChannelRequest {
    pub text: String,
    /// Normalized query terms and phrases for entity matching.
    pub terms: Vec<String>,
    /// Shared query embedding; `None` when the embedding call failed.
    pub embedding: Option<Arc<Embedding>>,
    pub top_k: usize,
    pub namespace: Option<String>,
}
