//! Intent classification: model first, heuristic fallback, uniform last,
//! cached by normalized text, weights read from a hot-reloadable table.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use sieve_core::config::IntentConfig;
use sieve_core::errors::ConfigError;
use sieve_core::intent::{ChannelWeights, Intent, ProfileSource};
use sieve_retrieval::{IntentClassifier, WeightTable};
use test_fixtures::{ModelScript, ScriptedIntentModel};

fn classifier_with(model: Arc<ScriptedIntentModel>) -> IntentClassifier {
    IntentClassifier::new(&IntentConfig::default(), Arc::new(WeightTable::default())).with_model(model)
}

#[tokio::test]
async fn model_label_wins_over_heuristic() {
    let model = ScriptedIntentModel::label("Summary.");
    let classifier = classifier_with(model.clone());

    let profile = classifier.classify("What is the capital of France?", &[]).await;
    assert_eq!(profile.intent, Intent::Summary);
    assert_eq!(profile.source, ProfileSource::Model);
    assert_eq!(profile.weights, ChannelWeights::new(0.1, 0.0, 0.1, 0.8));
    assert_eq!(model.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn slow_model_falls_back_to_heuristic() {
    let model = ScriptedIntentModel::new(ModelScript::Slow {
        delay: Duration::from_secs(5),
        label: "summary".into(),
    });
    let classifier = classifier_with(model.clone());

    let profile = classifier.classify("What is the capital of France?", &[]).await;
    assert_eq!(profile.intent, Intent::Factual);
    assert_eq!(profile.source, ProfileSource::Heuristic);
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn unparsable_or_failing_model_falls_back_to_heuristic() {
    for model in [
        ScriptedIntentModel::label("banana"),
        ScriptedIntentModel::new(ModelScript::Error),
    ] {
        let classifier = classifier_with(model);
        let profile = classifier.classify("postgres_replication_lag", &[]).await;
        assert_eq!(profile.intent, Intent::Keyword);
        assert_eq!(profile.source, ProfileSource::Heuristic);
    }
}

#[tokio::test]
async fn unmatched_query_without_model_gets_uniform_weights() {
    let classifier =
        IntentClassifier::new(&IntentConfig::default(), Arc::new(WeightTable::default()));
    let profile = classifier.classify("revenue guidance for next quarter", &[]).await;
    assert_eq!(profile.source, ProfileSource::Uniform);
    assert_eq!(profile.weights, ChannelWeights::UNIFORM);
    assert_eq!(profile.confidence, 0.0);
}

#[tokio::test]
async fn repeated_query_is_served_from_cache() {
    let model = ScriptedIntentModel::label("exploratory");
    let classifier = classifier_with(model.clone());

    let first = classifier.classify("Tell me about  Mergers", &[]).await;
    let second = classifier.classify("tell me about mergers", &[]).await;

    assert_eq!(first.source, ProfileSource::Model);
    assert_eq!(second.source, ProfileSource::Cache);
    assert_eq!(second.intent, first.intent);
    assert_eq!(second.confidence, first.confidence);
    assert_eq!(model.calls(), 1);
    assert_eq!(classifier.cached_len(), 1);
}

#[tokio::test]
async fn hot_reload_changes_weights_of_cached_intents() {
    let classifier =
        IntentClassifier::new(&IntentConfig::default(), Arc::new(WeightTable::default()));
    let before = classifier.classify("database", &[]).await;
    assert_eq!(before.weights.sparse, 0.6);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[keyword]
dense = 0.0
sparse = 1.0
graph_local = 0.0
graph_global = 0.0
"#
    )
    .unwrap();
    classifier.weights().reload_from_file(file.path()).unwrap();

    let after = classifier.classify("database", &[]).await;
    assert_eq!(after.source, ProfileSource::Cache);
    assert_eq!(after.weights, ChannelWeights::new(0.0, 1.0, 0.0, 0.0));
    // Sections absent from the file fall back to the built-in profiles.
    assert_eq!(
        classifier.weights().get(Intent::Summary),
        ChannelWeights::new(0.1, 0.0, 0.1, 0.8)
    );
}

#[test]
fn rejected_reload_keeps_previous_table() {
    let table = WeightTable::default();
    let before = table.snapshot();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "[factual]\ndense = -1.0\nsparse = 0.3\ngraph_local = 0.4\ngraph_global = 0.0\n"
    )
    .unwrap();
    assert!(matches!(
        table.reload_from_file(file.path()),
        Err(ConfigError::ValidationFailed { .. })
    ));

    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        table.reload_from_file(&dir.path().join("missing.toml")),
        Err(ConfigError::FileNotFound { .. })
    ));

    let mut garbage = tempfile::NamedTempFile::new().unwrap();
    write!(garbage, "[factual\n").unwrap();
    assert!(matches!(
        table.reload_from_file(garbage.path()),
        Err(ConfigError::ParseError { .. })
    ));

    assert_eq!(table.snapshot(), before);
}
