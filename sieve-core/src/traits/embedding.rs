use async_trait::async_trait;

use crate::errors::EmbeddingError;
use crate::models::Embedding;

/// Embedding generation provider.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a text, returning dense and sparse vectors from one call.
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;

    /// The dimensionality of dense vectors produced by this provider.
    fn dimensions(&self) -> usize;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}
