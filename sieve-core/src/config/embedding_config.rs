use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Dense vector dimensionality. The store rejects any other size.
    pub dimensions: usize,
    /// Hash space for sparse token ids.
    pub sparse_buckets: u32,
    /// Max cached embeddings.
    pub cache_size: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            sparse_buckets: defaults::DEFAULT_SPARSE_BUCKETS,
            cache_size: defaults::DEFAULT_EMBEDDING_CACHE_SIZE,
        }
    }
}
