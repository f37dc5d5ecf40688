//! The reference channels over SQLite storage, seeded from the mixed corpus.

use std::io::Write;

use sieve_core::config::SieveConfig;
use sieve_core::errors::{ConfigError, RetrievalError, SieveError};
use sieve_core::intent::{ChannelWeights, Intent};
use sieve_core::models::{ChannelKind, ChannelStatus, ChunkPayload, Entity, Query};
use sieve_core::traits::GraphStore;
use sieve_core::CancellationToken;
use sieve_retrieval::SqliteBackends;
use test_fixtures::{seed_corpus, Corpus};

async fn seeded() -> SqliteBackends {
    let backends = SqliteBackends::open(&SieveConfig::default()).unwrap();
    let corpus = Corpus::load("mixed_corpus");
    seed_corpus(
        &corpus,
        &backends.vectors,
        &backends.graph,
        backends.embedder.as_ref(),
    )
    .await
    .unwrap();
    backends
}

#[tokio::test]
async fn factual_question_ranks_the_answering_chunk_first() {
    let backends = seeded().await;
    let engine = backends.engine(SieveConfig::default(), None).unwrap();

    let result = engine
        .retrieve(&Query::new("What is the capital of France?"), &CancellationToken::new())
        .await
        .unwrap();

    let d = &result.diagnostics;
    assert_eq!(d.intent.intent, Intent::Factual);
    assert!(!d.partial_degradation, "{:?}", d.channels);
    assert!(matches!(d.channels[&ChannelKind::GraphGlobal], ChannelStatus::Ok { .. }));
    assert_eq!(result.items[0].doc_id, "C3");
    assert_eq!(result.items[0].per_channel_rank[&ChannelKind::GraphLocal], 1);
}

#[tokio::test]
async fn exact_phrase_keyword_query_is_found_by_sparse() {
    let backends = seeded().await;
    let engine = backends.engine(SieveConfig::default(), None).unwrap();

    let result = engine
        .retrieve(&Query::new("revenue 15%"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.diagnostics.intent.intent, Intent::Keyword);
    let top3: Vec<&str> = result.doc_ids().into_iter().take(3).collect();
    assert!(top3.contains(&"C1"), "{top3:?}");
    let c1 = result.items.iter().find(|i| i.doc_id == "C1").unwrap();
    assert_eq!(c1.per_channel_rank[&ChannelKind::Sparse], 1);
}

#[tokio::test]
async fn summary_query_pulls_in_community_chunks() {
    let backends = seeded().await;
    let engine = backends.engine(SieveConfig::default(), None).unwrap();

    let result = engine
        .retrieve(&Query::new("overview of France and Germany"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.diagnostics.intent.intent, Intent::Summary);
    // Sparse has zero weight for summaries: it runs but never contributes.
    assert!(matches!(
        result.diagnostics.channels[&ChannelKind::Sparse],
        ChannelStatus::Ok { .. }
    ));
    assert!(result
        .items
        .iter()
        .all(|item| !item.contributing_channels.contains(&ChannelKind::Sparse)));
    assert_eq!(result.items[0].community_id.as_deref(), Some("geography"));
    let global: Vec<&str> = result
        .items
        .iter()
        .filter(|i| i.contributing_channels.contains(&ChannelKind::GraphGlobal))
        .map(|i| i.doc_id.as_str())
        .collect();
    assert_eq!(global.len(), 3);
    for doc in ["C3", "C4", "C8"] {
        assert!(global.contains(&doc), "{doc} missing from {global:?}");
    }
}

#[tokio::test]
async fn namespace_filter_applies_to_every_channel() {
    let backends = seeded().await;
    let engine = backends.engine(SieveConfig::default(), None).unwrap();
    let atlas = ["C3", "C4", "C8"];

    for text in ["database", "What is the capital of Germany?"] {
        let result = engine
            .retrieve(&Query::new(text).with_namespace("atlas"), &CancellationToken::new())
            .await
            .unwrap();
        assert!(!result.diagnostics.partial_degradation);
        for doc in result.doc_ids() {
            assert!(atlas.contains(&doc), "{doc} leaked into namespace atlas for {text:?}");
        }
    }
}

#[tokio::test]
async fn tokenless_query_is_rejected_not_degraded() {
    let backends = seeded().await;
    let engine = backends.engine(SieveConfig::default(), None).unwrap();

    for text in ["C", "R?", "é"] {
        let err = engine
            .retrieve(&Query::new(text), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::InvalidQuery { .. }), "{text:?}: {err}");
    }
    assert!(engine.degradation_tracker().active_degradations().is_empty());
}

#[tokio::test]
async fn ingest_then_retrieve_through_backends() {
    let backends = SqliteBackends::open(&SieveConfig::default()).unwrap();
    let payload = ChunkPayload {
        text: "Tidal turbines generate power from ocean currents".into(),
        source_doc_id: "energy".into(),
        community_id: Some("energy".into()),
        namespace: None,
    };
    backends.ingest_chunk("T1", &payload).await.unwrap();
    let turbine = Entity {
        entity_id: "E-turbine".into(),
        name: "Tidal Turbine".into(),
        community_id: Some("energy".into()),
    };
    backends.link_entity(&turbine, &["T1"], None).await.unwrap();

    assert_eq!(backends.vectors.count().await.unwrap(), 1);
    let resolved = backends
        .graph
        .resolve_entities(&["tidal turbine".to_string()])
        .await
        .unwrap();
    assert_eq!(resolved, vec![turbine.clone()]);

    let engine = backends.engine(SieveConfig::default(), None).unwrap();
    let result = engine
        .retrieve(&Query::new("how do tidal turbines work"), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(result.doc_ids(), vec!["T1"]);
}

#[tokio::test]
async fn weights_file_from_config_is_loaded() {
    let backends = seeded().await;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "[factual]\ndense = 0.0\nsparse = 0.0\ngraph_local = 1.0\ngraph_global = 0.0\n"
    )
    .unwrap();

    let mut config = SieveConfig::default();
    config.intent.weights_path = Some(file.path().display().to_string());
    let engine = backends.engine(config, None).unwrap();
    assert_eq!(
        engine.classifier().weights().get(Intent::Factual),
        ChannelWeights::new(0.0, 0.0, 1.0, 0.0)
    );

    let result = engine
        .retrieve(&Query::new("What is the capital of France?"), &CancellationToken::new())
        .await
        .unwrap();
    assert!(result
        .items
        .iter()
        .all(|item| item.contributing_channels.len() == 1
            && item.contributing_channels.contains(&ChannelKind::GraphLocal)));
    assert_eq!(result.doc_ids(), vec!["C3", "C4", "C8"]);
}

#[tokio::test]
async fn missing_weights_file_fails_engine_construction() {
    let backends = SqliteBackends::open(&SieveConfig::default()).unwrap();
    let mut config = SieveConfig::default();
    config.intent.weights_path = Some("/nonexistent/sieve-weights.toml".into());

    let err = backends.engine(config, None).err().expect("construction fails");
    assert!(matches!(
        err,
        SieveError::Config(ConfigError::FileNotFound { .. })
    ));
}
