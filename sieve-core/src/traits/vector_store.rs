use async_trait::async_trait;

use crate::errors::StorageError;
use crate::models::{ChunkPayload, ScoredChunk, SparseVector};

/// Storage that keeps a chunk's dense and sparse vectors together.
///
/// `upsert_chunk` is atomic: after it returns, either both vectors (and the
/// payload) are visible, or none of the write is.
#[async_trait]
pub trait DualVectorStore: Send + Sync {
    async fn upsert_chunk(
        &self,
        chunk_id: &str,
        dense: &[f32],
        sparse: &SparseVector,
        payload: &ChunkPayload,
    ) -> Result<(), StorageError>;

    /// Top-k by cosine similarity. Ties broken by chunk id ascending.
    async fn query_dense(
        &self,
        vector: &[f32],
        top_k: usize,
        namespace: Option<&str>,
    ) -> Result<Vec<ScoredChunk>, StorageError>;

    /// Top-k by sparse dot product. Chunks sharing no token are not returned.
    async fn query_sparse(
        &self,
        sparse: &SparseVector,
        top_k: usize,
        namespace: Option<&str>,
    ) -> Result<Vec<ScoredChunk>, StorageError>;
}
