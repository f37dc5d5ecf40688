//! Weighted Reciprocal Rank Fusion: score = Σ w_channel / (k + rank_channel)
//!
//! Channels with zero weight contribute nothing and are not listed as
//! contributors. A document absent from a channel gets no term from it.
//! Ordering is total: score descending, then more contributing channels,
//! then smaller document id.

use std::cmp::Ordering;
use std::collections::HashMap;

use sieve_core::intent::ChannelWeights;
use sieve_core::models::{ChannelKind, ChannelResult, FusionCandidate};

/// Fuse per-channel ranked lists.
///
/// `k` is the smoothing constant (default 60); callers validate `k > 0`.
/// Lists are accumulated in channel order so the floating-point sum does
/// not depend on the order the channels finished in.
pub fn fuse(
    ranked_lists: &[(ChannelKind, &ChannelResult)],
    weights: &ChannelWeights,
    k: f64,
) -> Vec<FusionCandidate> {
    let mut lists: Vec<&(ChannelKind, &ChannelResult)> = ranked_lists.iter().collect();
    lists.sort_by_key(|(kind, _)| *kind);

    let mut fused: HashMap<&str, FusionCandidate> = HashMap::new();
    for (kind, result) in lists {
        let weight = weights.get(*kind);
        if weight <= 0.0 || !weight.is_finite() {
            continue;
        }
        for doc in result.iter() {
            let candidate = fused
                .entry(doc.doc_id.as_str())
                .or_insert_with(|| FusionCandidate {
                    doc_id: doc.doc_id.clone(),
                    fused_score: 0.0,
                    contributing_channels: Default::default(),
                    per_channel_rank: Default::default(),
                    community_id: None,
                });
            candidate.fused_score += weight / (k + doc.rank as f64);
            candidate.contributing_channels.insert(*kind);
            candidate.per_channel_rank.insert(*kind, doc.rank);
            if candidate.community_id.is_none() {
                candidate.community_id = doc.community_id.clone();
            }
        }
    }

    let mut candidates: Vec<FusionCandidate> = fused.into_values().collect();
    candidates.sort_by(compare);
    candidates
}

/// Total order used for the fused ranking.
pub fn compare(a: &FusionCandidate, b: &FusionCandidate) -> Ordering {
    b.fused_score
        .total_cmp(&a.fused_score)
        .then_with(|| {
            b.contributing_channels
                .len()
                .cmp(&a.contributing_channels.len())
        })
        .then_with(|| a.doc_id.cmp(&b.doc_id))
}
