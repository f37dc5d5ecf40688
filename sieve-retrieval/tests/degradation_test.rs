//! Partial failure, cancellation, saturation and retry behavior of the
//! fan-out. None of these conditions may surface as a `RetrievalError`.

use std::sync::Arc;
use std::time::Duration;

use sieve_core::cancellation::Cancellable;
use sieve_core::config::SieveConfig;
use sieve_core::errors::{RetrievalError, SieveError};
use sieve_core::models::{ChannelKind, ChannelStatus, Query, RetrievalOutcome};
use sieve_core::traits::{ChannelExecutor, EmbeddingProvider};
use sieve_core::CancellationToken;
use sieve_embeddings::HashingEmbedder;
use sieve_observability::RecoveryStatus;
use sieve_retrieval::{ChannelSet, IntentClassifier, RetrievalEngine, WeightTable};
use test_fixtures::{FailingEmbedder, ScriptedChannel, ScriptedIntentModel};

const FACTUAL: &str = "What is the capital of France?";

fn build(
    config: SieveConfig,
    channels: [Arc<dyn ChannelExecutor>; 4],
    embedder: Arc<dyn EmbeddingProvider>,
    model_label: Option<&str>,
) -> RetrievalEngine {
    let mut classifier = IntentClassifier::new(&config.intent, Arc::new(WeightTable::default()));
    if let Some(label) = model_label {
        classifier = classifier.with_model(ScriptedIntentModel::label(label));
    }
    let [dense, sparse, graph_local, graph_global] = channels;
    RetrievalEngine::new(
        config,
        classifier,
        embedder,
        ChannelSet {
            dense,
            sparse,
            graph_local,
            graph_global,
        },
    )
    .expect("valid engine")
}

fn hashing() -> Arc<dyn EmbeddingProvider> {
    Arc::new(HashingEmbedder::new(32, 1 << 12))
}

fn healthy(kind: ChannelKind) -> Arc<dyn ChannelExecutor> {
    let docs: &[&str] = match kind {
        ChannelKind::Dense => &["a", "b"],
        ChannelKind::Sparse => &["b", "c"],
        ChannelKind::GraphLocal => &["c", "a"],
        ChannelKind::GraphGlobal => &["d"],
    };
    ScriptedChannel::returning(kind, docs)
}

#[tokio::test]
async fn any_subset_of_failing_channels_still_answers() {
    // Exploratory weights every channel, so each failure costs results.
    for failing in 1..=4 {
        let channels = ChannelKind::ALL.map(|kind| {
            if (kind as usize) < failing {
                ScriptedChannel::failing(kind, false) as Arc<dyn ChannelExecutor>
            } else {
                healthy(kind)
            }
        });
        let engine = build(SieveConfig::default(), channels, hashing(), Some("exploratory"));

        let result = engine
            .retrieve(&Query::new("how does everything fit together"), &CancellationToken::new())
            .await
            .expect("channel failures are not errors");

        let d = &result.diagnostics;
        assert!(d.partial_degradation, "{failing} failing channels");
        assert_eq!(d.failed_channels().len(), failing);
        if failing == 4 {
            assert!(result.items.is_empty());
            assert_eq!(d.outcome(), RetrievalOutcome::NoResults);
        } else {
            assert!(!result.items.is_empty());
            assert_eq!(d.outcome(), RetrievalOutcome::Degraded);
        }
    }
}

#[tokio::test]
async fn failed_channel_reason_is_reported() {
    let engine = build(
        SieveConfig::default(),
        [
            ScriptedChannel::failing(ChannelKind::Dense, false),
            healthy(ChannelKind::Sparse),
            healthy(ChannelKind::GraphLocal),
            healthy(ChannelKind::GraphGlobal),
        ],
        hashing(),
        None,
    );
    let result = engine
        .retrieve(&Query::new(FACTUAL), &CancellationToken::new())
        .await
        .unwrap();
    match &result.diagnostics.channels[&ChannelKind::Dense] {
        ChannelStatus::Failed { reason } => assert!(reason.contains("scripted permanent failure")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(result
        .items
        .iter()
        .all(|item| !item.contributing_channels.contains(&ChannelKind::Dense)));
}

#[tokio::test]
async fn transient_failure_is_retried_once() {
    let dense = ScriptedChannel::flaky(ChannelKind::Dense, 1, &["a"]);
    let engine = build(
        SieveConfig::default(),
        [
            dense.clone(),
            healthy(ChannelKind::Sparse),
            healthy(ChannelKind::GraphLocal),
            healthy(ChannelKind::GraphGlobal),
        ],
        hashing(),
        None,
    );
    let result = engine
        .retrieve(&Query::new(FACTUAL), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(dense.calls(), 2);
    assert_eq!(
        result.diagnostics.channels[&ChannelKind::Dense],
        ChannelStatus::Ok { hits: 1 }
    );
    assert!(!result.diagnostics.partial_degradation);
}

#[tokio::test]
async fn permanent_failure_is_not_retried() {
    let dense = ScriptedChannel::failing(ChannelKind::Dense, false);
    let engine = build(
        SieveConfig::default(),
        [
            dense.clone(),
            healthy(ChannelKind::Sparse),
            healthy(ChannelKind::GraphLocal),
            healthy(ChannelKind::GraphGlobal),
        ],
        hashing(),
        None,
    );
    engine
        .retrieve(&Query::new(FACTUAL), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(dense.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn caller_cancellation_returns_cancelled_and_stops_channels() {
    let dense = ScriptedChannel::slow(ChannelKind::Dense, Duration::from_secs(2), &["a"]);
    let engine = build(
        SieveConfig::default(),
        [
            dense.clone(),
            healthy(ChannelKind::Sparse),
            healthy(ChannelKind::GraphLocal),
            healthy(ChannelKind::GraphGlobal),
        ],
        hashing(),
        None,
    );
    let token = CancellationToken::new();
    let canceller = {
        let token = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        })
    };

    let err = engine
        .retrieve(&Query::new(FACTUAL), &token)
        .await
        .unwrap_err();
    assert!(matches!(err, RetrievalError::Cancelled));
    assert!(!SieveError::from(err).is_fatal());
    canceller.await.unwrap();

    // Give an orphaned task every chance to finish; it must have been dropped.
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(dense.calls(), 1);
    assert_eq!(dense.completed(), 0);
}

#[tokio::test]
async fn already_cancelled_token_runs_nothing() {
    let dense = ScriptedChannel::returning(ChannelKind::Dense, &["a"]);
    let engine = build(
        SieveConfig::default(),
        [
            dense.clone(),
            healthy(ChannelKind::Sparse),
            healthy(ChannelKind::GraphLocal),
            healthy(ChannelKind::GraphGlobal),
        ],
        hashing(),
        None,
    );
    let token = CancellationToken::new();
    token.cancel();

    let err = engine.retrieve(&Query::new(FACTUAL), &token).await.unwrap_err();
    assert!(matches!(err, RetrievalError::Cancelled));
    assert_eq!(dense.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn saturated_channel_fails_fast_for_the_second_query() {
    let mut config = SieveConfig::default();
    config.channels.max_concurrency = 1;
    config.channels.queue_timeout_ms = 25;
    let dense = ScriptedChannel::slow(ChannelKind::Dense, Duration::from_millis(300), &["a"]);
    let engine = build(
        config,
        [
            dense.clone(),
            healthy(ChannelKind::Sparse),
            healthy(ChannelKind::GraphLocal),
            healthy(ChannelKind::GraphGlobal),
        ],
        hashing(),
        None,
    );

    let query = Query::new(FACTUAL);
    let (first, second) = futures::future::join(
        engine.retrieve(&query, &CancellationToken::new()),
        engine.retrieve(&query, &CancellationToken::new()),
    )
    .await;

    let statuses = [
        first.unwrap().diagnostics.channels[&ChannelKind::Dense].clone(),
        second.unwrap().diagnostics.channels[&ChannelKind::Dense].clone(),
    ];
    assert!(statuses.contains(&ChannelStatus::Ok { hits: 1 }), "{statuses:?}");
    assert!(statuses.contains(&ChannelStatus::Saturated), "{statuses:?}");
    assert_eq!(dense.calls(), 1);
    assert_eq!(engine.guard(ChannelKind::Dense).available_permits(), 1);
}

#[tokio::test]
async fn embedding_failure_only_affects_vector_channels() {
    let dense = ScriptedChannel::returning(ChannelKind::Dense, &["a"]);
    let sparse = ScriptedChannel::returning(ChannelKind::Sparse, &["b"]);
    let engine = build(
        SieveConfig::default(),
        [
            dense.clone(),
            sparse.clone(),
            healthy(ChannelKind::GraphLocal),
            healthy(ChannelKind::GraphGlobal),
        ],
        Arc::new(FailingEmbedder { dimensions: 32 }),
        None,
    );
    let result = engine
        .retrieve(&Query::new(FACTUAL), &CancellationToken::new())
        .await
        .unwrap();

    let d = &result.diagnostics;
    for kind in [ChannelKind::Dense, ChannelKind::Sparse] {
        match &d.channels[&kind] {
            ChannelStatus::Failed { reason } => assert!(reason.starts_with("embedding unavailable")),
            other => panic!("{kind}: expected failure, got {other:?}"),
        }
    }
    assert_eq!(dense.calls(), 0);
    assert_eq!(sparse.calls(), 0);
    assert_eq!(d.channels[&ChannelKind::GraphLocal], ChannelStatus::Ok { hits: 2 });
    assert_eq!(result.doc_ids(), vec!["c", "a"]);
}

#[tokio::test]
async fn renormalization_rescales_surviving_weights() {
    let run = |renormalize: bool| async move {
        let mut config = SieveConfig::default();
        config.fusion.renormalize_on_degradation = renormalize;
        let engine = build(
            config,
            [
                ScriptedChannel::failing(ChannelKind::Dense, false),
                ScriptedChannel::returning(ChannelKind::Sparse, &["s"]),
                ScriptedChannel::returning(ChannelKind::GraphLocal, &["l"]),
                healthy(ChannelKind::GraphGlobal),
            ],
            hashing(),
            None,
        );
        engine
            .retrieve(&Query::new(FACTUAL), &CancellationToken::new())
            .await
            .unwrap()
    };

    let raw = run(false).await;
    let scaled = run(true).await;
    assert_eq!(raw.doc_ids(), scaled.doc_ids());
    assert_eq!(scaled.doc_ids(), vec!["l", "s"]);

    // Factual: sparse 0.3 and local 0.4 survive out of a total of 1.0.
    let s = scaled.items.iter().find(|i| i.doc_id == "s").unwrap();
    assert!((s.fused_score - (0.3 / 0.7) / 61.0).abs() < 1e-12);
    let s_raw = raw.items.iter().find(|i| i.doc_id == "s").unwrap();
    assert!((s_raw.fused_score - 0.3 / 61.0).abs() < 1e-12);
}

#[tokio::test]
async fn invalid_queries_are_rejected_before_any_channel_runs() {
    let dense = ScriptedChannel::returning(ChannelKind::Dense, &["a"]);
    let engine = build(
        SieveConfig::default(),
        [
            dense.clone(),
            healthy(ChannelKind::Sparse),
            healthy(ChannelKind::GraphLocal),
            healthy(ChannelKind::GraphGlobal),
        ],
        hashing(),
        None,
    );
    let too_long = "x".repeat(engine.config().fusion.max_query_chars + 1);
    let cases = [
        Query::new(""),
        Query::new("   \t"),
        Query::new(too_long),
        // Nothing here survives tokenization, so no channel could match.
        Query::new("C"),
        Query::new("R?"),
        Query::new("é"),
        Query::new(FACTUAL).with_top_n(0),
        Query::new(FACTUAL).with_top_n(sieve_core::constants::MAX_TOP_N + 1),
    ];
    for query in cases {
        let err = engine
            .retrieve(&query, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::InvalidQuery { .. }), "{err}");
        assert!(SieveError::from(err).is_fatal());
    }
    assert_eq!(dense.calls(), 0);
    assert_eq!(engine.query_log().count(), 0);
    assert!(engine.degradation_tracker().events().is_empty());
}

#[tokio::test]
async fn degradation_is_tracked_and_recovers() {
    let mut config = SieveConfig::default();
    config.channels.max_retries = 0;
    let dense = ScriptedChannel::flaky(ChannelKind::Dense, 1, &["a"]);
    let engine = build(
        config,
        [
            dense.clone(),
            healthy(ChannelKind::Sparse),
            healthy(ChannelKind::GraphLocal),
            healthy(ChannelKind::GraphGlobal),
        ],
        hashing(),
        None,
    );

    let first = engine
        .retrieve(&Query::new(FACTUAL), &CancellationToken::new())
        .await
        .unwrap();
    assert!(first.diagnostics.partial_degradation);
    assert!(engine.degradation_tracker().is_degraded("channel.dense"));

    let second = engine
        .retrieve(&Query::new(FACTUAL), &CancellationToken::new())
        .await
        .unwrap();
    assert!(!second.diagnostics.partial_degradation);

    let tracker = engine.degradation_tracker();
    assert!(!tracker.is_degraded("channel.dense"));
    assert_eq!(tracker.events().len(), 1);
    assert_eq!(tracker.events()[0].recovery_status, RecoveryStatus::Recovered);
    drop(tracker);

    let log = engine.query_log();
    assert_eq!(log.count(), 2);
    assert_eq!(log.entries()[0].degraded_channels, vec![ChannelKind::Dense]);
    assert!(log.entries()[1].degraded_channels.is_empty());
}
