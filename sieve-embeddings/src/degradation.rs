//! Fallback chain for embedding generation.
//!
//! Providers are tried in order; every fallback is recorded as a
//! `DegradationEvent` and logged.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tracing::warn;

use sieve_core::errors::EmbeddingError;
use sieve_core::models::{DegradationEvent, Embedding};
use sieve_core::traits::EmbeddingProvider;

#[derive(Default)]
pub struct DegradationChain {
    chain: Vec<Arc<dyn EmbeddingProvider>>,
    events: Mutex<Vec<DegradationEvent>>,
}

impl DegradationChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider to the end of the chain.
    pub fn push(&mut self, provider: Arc<dyn EmbeddingProvider>) {
        self.chain.push(provider);
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn active_provider_name(&self) -> &str {
        self.chain.first().map(|p| p.name()).unwrap_or("none")
    }

    /// Embed with the first provider that succeeds. Returns the embedding
    /// and the name of the provider that produced it.
    ///
    /// `EmptyInput` is a property of the text, not the provider, so it is
    /// returned immediately.
    pub async fn embed(&self, text: &str) -> Result<(Embedding, String), EmbeddingError> {
        let mut last_error = None;
        for (i, provider) in self.chain.iter().enumerate() {
            match provider.embed(text).await {
                Ok(embedding) => return Ok((embedding, provider.name().to_string())),
                Err(EmbeddingError::EmptyInput) => return Err(EmbeddingError::EmptyInput),
                Err(e) => {
                    let fallback = self
                        .chain
                        .get(i + 1)
                        .map(|p| p.name().to_string())
                        .unwrap_or_else(|| "none".to_string());
                    warn!(
                        provider = provider.name(),
                        fallback = %fallback,
                        error = %e,
                        "embedding provider failed, falling back"
                    );
                    self.record(DegradationEvent {
                        component: format!("embedding.{}", provider.name()),
                        failure: e.to_string(),
                        fallback_used: fallback,
                        timestamp: Utc::now(),
                    });
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| EmbeddingError::ProviderUnavailable {
            provider: format!("all {} providers failed", self.chain.len()),
        }))
    }

    fn record(&self, event: DegradationEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    /// Drain accumulated degradation events.
    pub fn drain_events(&self) -> Vec<DegradationEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::HashingEmbedder;
    use async_trait::async_trait;

    struct Failing;

    #[async_trait]
    impl EmbeddingProvider for Failing {
        async fn embed(&self, _text: &str) -> Result<Embedding, EmbeddingError> {
            Err(EmbeddingError::InferenceFailed {
                reason: "model offline".into(),
            })
        }
        fn dimensions(&self) -> usize {
            16
        }
        fn name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn falls_back_and_records_event() {
        let mut chain = DegradationChain::new();
        chain.push(Arc::new(Failing));
        chain.push(Arc::new(HashingEmbedder::new(16, 1024)));

        let (embedding, provider) = chain.embed("quarterly revenue").await.unwrap();
        assert_eq!(provider, "hashing");
        assert_eq!(embedding.dense.len(), 16);

        let events = chain.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].component, "embedding.failing");
        assert_eq!(events[0].fallback_used, "hashing");
        assert!(chain.drain_events().is_empty());
    }

    #[tokio::test]
    async fn all_failing_returns_last_error() {
        let mut chain = DegradationChain::new();
        chain.push(Arc::new(Failing));
        assert!(matches!(
            chain.embed("x y").await,
            Err(EmbeddingError::InferenceFailed { .. })
        ));
    }

    #[tokio::test]
    async fn empty_chain_is_unavailable() {
        let chain = DegradationChain::new();
        assert!(matches!(
            chain.embed("text").await,
            Err(EmbeddingError::ProviderUnavailable { .. })
        ));
    }
}
