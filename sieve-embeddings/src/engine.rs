//! EmbeddingEngine: cache + fallback chain + dimension check.
//! Implements `EmbeddingProvider`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use sieve_core::config::EmbeddingConfig;
use sieve_core::errors::EmbeddingError;
use sieve_core::models::{DegradationEvent, Embedding};
use sieve_core::traits::EmbeddingProvider;

use crate::cache::EmbeddingCache;
use crate::degradation::DegradationChain;
use crate::providers::HashingEmbedder;

pub struct EmbeddingEngine {
    chain: DegradationChain,
    cache: EmbeddingCache,
    dimensions: usize,
}

impl EmbeddingEngine {
    /// Engine backed only by the hashing embedder.
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self::build(None, config)
    }

    /// Engine that tries `primary` first and falls back to the hashing embedder.
    pub fn with_primary(primary: Arc<dyn EmbeddingProvider>, config: &EmbeddingConfig) -> Self {
        Self::build(Some(primary), config)
    }

    fn build(primary: Option<Arc<dyn EmbeddingProvider>>, config: &EmbeddingConfig) -> Self {
        let mut chain = DegradationChain::new();
        if let Some(primary) = primary {
            chain.push(primary);
        }
        chain.push(Arc::new(HashingEmbedder::new(
            config.dimensions,
            config.sparse_buckets,
        )));

        info!(
            provider = chain.active_provider_name(),
            dims = config.dimensions,
            cache_size = config.cache_size,
            "EmbeddingEngine initialized"
        );

        Self {
            chain,
            cache: EmbeddingCache::new(config.cache_size),
            dimensions: config.dimensions,
        }
    }

    /// Embed with caching, returning a shareable handle.
    pub async fn embed_shared(&self, text: &str) -> Result<Arc<Embedding>, EmbeddingError> {
        let key = EmbeddingCache::key_for(text);
        if let Some(hit) = self.cache.get(&key) {
            debug!(key = %key, "embedding cache hit");
            return Ok(hit);
        }

        let (embedding, provider) = self.chain.embed(text).await?;
        if embedding.dense.len() != self.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimensions,
                actual: embedding.dense.len(),
            });
        }
        debug!(provider = %provider, "embedded text");

        let embedding = Arc::new(embedding);
        self.cache.insert(key, Arc::clone(&embedding));
        Ok(embedding)
    }

    pub fn drain_degradation_events(&self) -> Vec<DegradationEvent> {
        self.chain.drain_events()
    }

    pub fn active_provider(&self) -> &str {
        self.chain.active_provider_name()
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }
}

#[async_trait]
impl EmbeddingProvider for EmbeddingEngine {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        Ok(self.embed_shared(text).await?.as_ref().clone())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "engine"
    }
}
