//! IntentClassifier: model call under a hard timeout, heuristic fallback,
//! uniform weights when both give up. Never fails the query.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tracing::{debug, Instrument};

use sieve_core::config::IntentConfig;
use sieve_core::errors::ClassificationError;
use sieve_core::intent::{Intent, IntentProfile, ProfileSource};
use sieve_core::traits::IntentModel;
use sieve_observability::classification_span;
use sieve_observability::tracing_setup::events;

use super::heuristic;
use super::weight_table::WeightTable;

/// Confidence assigned to a label the model produced.
pub const MODEL_CONFIDENCE: f64 = 0.9;

/// Cached classification. Weights are looked up at read time so a table
/// reload applies to cached intents immediately.
#[derive(Debug, Clone, Copy)]
struct CachedIntent {
    intent: Intent,
    confidence: f64,
}

pub struct IntentClassifier {
    model: Option<Arc<dyn IntentModel>>,
    model_timeout: Duration,
    cache: Cache<String, CachedIntent>,
    weights: Arc<WeightTable>,
}

impl IntentClassifier {
    /// Heuristic-only classifier.
    pub fn new(config: &IntentConfig, weights: Arc<WeightTable>) -> Self {
        Self {
            model: None,
            model_timeout: Duration::from_millis(config.model_timeout_ms),
            cache: Cache::builder().max_capacity(config.cache_capacity).build(),
            weights,
        }
    }

    pub fn with_model(mut self, model: Arc<dyn IntentModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn weights(&self) -> &Arc<WeightTable> {
        &self.weights
    }

    /// Cache key: trimmed, lowercased, whitespace collapsed.
    pub fn normalize(text: &str) -> String {
        text.split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Number of cached classifications.
    pub fn cached_len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub async fn classify(&self, text: &str, context: &[String]) -> IntentProfile {
        let key = Self::normalize(text);
        if let Some(hit) = self.cache.get(&key) {
            debug!(intent = %hit.intent, "intent cache hit");
            return self.profile(hit.intent, hit.confidence, ProfileSource::Cache);
        }

        let span = classification_span!(text.chars().count());
        let profile = self.classify_uncached(text, context).instrument(span).await;
        if profile.source != ProfileSource::Uniform {
            self.cache.insert(
                key,
                CachedIntent {
                    intent: profile.intent,
                    confidence: profile.confidence,
                },
            );
        }
        profile
    }

    async fn classify_uncached(&self, text: &str, context: &[String]) -> IntentProfile {
        if let Some(model) = &self.model {
            match self.ask_model(model.as_ref(), text, context).await {
                Ok(intent) => return self.profile(intent, MODEL_CONFIDENCE, ProfileSource::Model),
                Err(e) => events::classification_fallback(&e.to_string(), "heuristic"),
            }
        }

        match heuristic::classify(text) {
            Some(verdict) => {
                debug!(rule = verdict.rule, intent = %verdict.intent, "heuristic intent");
                self.profile(verdict.intent, verdict.confidence, ProfileSource::Heuristic)
            }
            None => {
                events::classification_fallback("no heuristic rule matched", "uniform");
                IntentProfile::uniform()
            }
        }
    }

    async fn ask_model(
        &self,
        model: &dyn IntentModel,
        text: &str,
        context: &[String],
    ) -> Result<Intent, ClassificationError> {
        let raw = tokio::time::timeout(self.model_timeout, model.classify(text, context))
            .await
            .map_err(|_| ClassificationError::Timeout {
                timeout_ms: self.model_timeout.as_millis() as u64,
            })??;
        Intent::parse_label(&raw).ok_or(ClassificationError::Unparsable { raw })
    }

    fn profile(&self, intent: Intent, confidence: f64, source: ProfileSource) -> IntentProfile {
        IntentProfile {
            intent,
            confidence,
            weights: self.weights.get(intent),
            source,
        }
    }
}
