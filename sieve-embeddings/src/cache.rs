//! In-memory embedding cache using moka.
//!
//! TinyLFU admission, bounded entry count, idle expiry.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use sieve_core::models::Embedding;

/// Keys are blake3 hashes of the embedded text.
pub struct EmbeddingCache {
    cache: Cache<String, Arc<Embedding>>,
}

impl EmbeddingCache {
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_idle(Duration::from_secs(3600))
            .build();
        Self { cache }
    }

    /// Content hash used as the cache key.
    pub fn key_for(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }

    pub fn get(&self, key: &str) -> Option<Arc<Embedding>> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: String, embedding: Arc<Embedding>) {
        self.cache.insert(key, embedding);
    }

    pub fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}
