//! Property tests for weighted RRF fusion and the fan-out around it.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;

use sieve_core::config::SieveConfig;
use sieve_core::intent::ChannelWeights;
use sieve_core::models::{ChannelKind, ChannelResult, FusionCandidate, Query};
use sieve_core::CancellationToken;
use sieve_embeddings::HashingEmbedder;
use sieve_retrieval::fusion::{compare, fuse};
use sieve_retrieval::{ChannelSet, IntentClassifier, RetrievalEngine, WeightTable};
use test_fixtures::ScriptedChannel;

const K: f64 = 60.0;

fn ranked_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(0u8..24, 0..10)
        .prop_map(|ids| ids.into_iter().map(|i| format!("d{i:02}")).collect::<Vec<_>>())
        .prop_shuffle()
}

fn four_lists() -> impl Strategy<Value = [Vec<String>; 4]> {
    (ranked_list(), ranked_list(), ranked_list(), ranked_list())
        .prop_map(|(a, b, c, d)| [a, b, c, d])
}

fn weights() -> impl Strategy<Value = ChannelWeights> {
    (0u8..=10, 0u8..=10, 0u8..=10, 0u8..=10).prop_map(|(a, b, c, d)| {
        ChannelWeights::new(
            f64::from(a) / 10.0,
            f64::from(b) / 10.0,
            f64::from(c) / 10.0,
            f64::from(d) / 10.0,
        )
    })
}

fn results(lists: &[Vec<String>; 4]) -> Vec<(ChannelKind, ChannelResult)> {
    ChannelKind::ALL
        .into_iter()
        .zip(lists.iter())
        .map(|(kind, ids)| (kind, ChannelResult::from_ordered(ids.iter().cloned())))
        .collect()
}

fn run_fuse(results: &[(ChannelKind, ChannelResult)], weights: &ChannelWeights) -> Vec<FusionCandidate> {
    let borrowed: Vec<(ChannelKind, &ChannelResult)> =
        results.iter().map(|(kind, r)| (*kind, r)).collect();
    fuse(&borrowed, weights, K)
}

fn scores(fused: &[FusionCandidate]) -> BTreeMap<String, f64> {
    fused
        .iter()
        .map(|c| (c.doc_id.clone(), c.fused_score))
        .collect()
}

proptest! {
    #[test]
    fn prop_fusion_is_deterministic_and_order_independent(lists in four_lists(), w in weights()) {
        let forward = results(&lists);
        let mut backward = forward.clone();
        backward.reverse();

        let a = run_fuse(&forward, &w);
        let b = run_fuse(&forward, &w);
        let c = run_fuse(&backward, &w);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(&a, &c);
    }

    #[test]
    fn prop_scores_follow_the_formula_and_order_is_total(lists in four_lists(), w in weights()) {
        let input = results(&lists);
        let fused = run_fuse(&input, &w);

        for candidate in &fused {
            let mut expected = 0.0;
            for (kind, result) in &input {
                let weight = w.get(*kind);
                match result.rank_of(&candidate.doc_id) {
                    Some(rank) if weight > 0.0 => {
                        expected += weight / (K + rank as f64);
                        prop_assert!(candidate.contributing_channels.contains(kind));
                    }
                    _ => prop_assert!(!candidate.contributing_channels.contains(kind)),
                }
            }
            prop_assert!((candidate.fused_score - expected).abs() < 1e-12);
            prop_assert!(!candidate.contributing_channels.is_empty());
        }
        for pair in fused.windows(2) {
            prop_assert_eq!(compare(&pair[0], &pair[1]), std::cmp::Ordering::Less);
        }
    }

    #[test]
    fn prop_promoting_a_document_never_lowers_its_score(
        lists in four_lists(),
        w in weights(),
        channel in 0usize..4,
        pick in any::<prop::sample::Index>(),
    ) {
        let list = &lists[channel];
        prop_assume!(list.len() >= 2);
        let i = pick.index(list.len() - 1) + 1;

        let mut promoted = lists.clone();
        promoted[channel].swap(i - 1, i);
        let promoted_doc = lists[channel][i].clone();
        let demoted_doc = lists[channel][i - 1].clone();

        let before = scores(&run_fuse(&results(&lists), &w));
        let after = scores(&run_fuse(&results(&promoted), &w));

        let kind = ChannelKind::ALL[channel];
        if w.get(kind) > 0.0 {
            prop_assert!(after[&promoted_doc] > before[&promoted_doc]);
            prop_assert!(after[&demoted_doc] < before[&demoted_doc]);
        } else {
            prop_assert_eq!(after.get(&promoted_doc), before.get(&promoted_doc));
        }
    }

    #[test]
    fn prop_raising_a_weight_only_lifts_that_channels_documents(
        lists in four_lists(),
        w in weights(),
        channel in 0usize..4,
        bump in 1u8..=10,
    ) {
        let kind = ChannelKind::ALL[channel];
        let mut heavier = w;
        heavier.set(kind, w.get(kind) + f64::from(bump) / 10.0);

        let input = results(&lists);
        let before = scores(&run_fuse(&input, &w));
        let after = scores(&run_fuse(&input, &heavier));

        for (doc, score) in &after {
            if lists[channel].contains(doc) {
                let old = before.get(doc).copied().unwrap_or(0.0);
                prop_assert!(*score > old, "{} did not rise", doc);
            } else {
                prop_assert_eq!(Some(score), before.get(doc));
            }
        }
    }

    #[test]
    fn prop_renormalization_preserves_ordering(
        lists in four_lists(),
        w in weights(),
        survivors in prop::sample::subsequence(ChannelKind::ALL.to_vec(), 1..=4),
    ) {
        let input: Vec<(ChannelKind, ChannelResult)> = results(&lists)
            .into_iter()
            .filter(|(kind, _)| survivors.contains(kind))
            .collect();
        let plain = run_fuse(&input, &w);
        let scaled = run_fuse(&input, &w.renormalized(&survivors));

        let mut plain_ids: Vec<&str> = plain.iter().map(|c| c.doc_id.as_str()).collect();
        let mut scaled_ids: Vec<&str> = scaled.iter().map(|c| c.doc_id.as_str()).collect();
        let original = scores(&plain);
        // Same order up to rounding: scaled order never contradicts the
        // unscaled scores beyond float noise.
        for pair in scaled.windows(2) {
            prop_assert!(original[&pair[0].doc_id] >= original[&pair[1].doc_id] - 1e-12);
        }
        plain_ids.sort_unstable();
        scaled_ids.sort_unstable();
        prop_assert_eq!(plain_ids, scaled_ids);
    }
}

fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_completion_order_does_not_change_the_ranking(
        lists in four_lists(),
        delays in prop::array::uniform4(0u64..200),
    ) {
        let rt = paused_runtime();
        let (fast, staggered) = rt.block_on(async {
            let build = |delays: [u64; 4]| {
                let channel = |i: usize| {
                    let ids: Vec<&str> = lists[i].iter().map(String::as_str).collect();
                    ScriptedChannel::slow(ChannelKind::ALL[i], Duration::from_millis(delays[i]), &ids)
                };
                let config = SieveConfig::default();
                let classifier = IntentClassifier::new(&config.intent, Arc::new(WeightTable::default()));
                RetrievalEngine::new(
                    config,
                    classifier,
                    Arc::new(HashingEmbedder::new(16, 256)),
                    ChannelSet {
                        dense: channel(0),
                        sparse: channel(1),
                        graph_local: channel(2),
                        graph_global: channel(3),
                    },
                )
                .unwrap()
            };
            // Long query: exploratory, every channel active.
            let query = Query::new(
                "walk me through every piece of the story and how each part leads into the next one",
            );
            let fast = build([0; 4]).retrieve(&query, &CancellationToken::new()).await.unwrap();
            let staggered = build(delays).retrieve(&query, &CancellationToken::new()).await.unwrap();
            (fast, staggered)
        });

        prop_assert!(!staggered.diagnostics.partial_degradation);
        prop_assert_eq!(fast.items, staggered.items);
    }
}
