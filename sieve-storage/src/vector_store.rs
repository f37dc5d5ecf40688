//! `DualVectorStore` over SQLite.

use async_trait::async_trait;
use tracing::{debug, warn};

use sieve_core::errors::StorageError;
use sieve_core::models::{ChunkPayload, ConsistencyReport, IndexedChunk, ScoredChunk, SparseVector};
use sieve_core::traits::DualVectorStore;

use crate::engine::StorageEngine;
use crate::queries::{chunk_ops, vector_search};

/// Dense + sparse vectors for each chunk in one row, with a sparse
/// inverted index maintained in the same transaction.
#[derive(Clone)]
pub struct SqliteVectorStore {
    engine: StorageEngine,
    dimensions: usize,
}

impl SqliteVectorStore {
    pub fn new(engine: StorageEngine, dimensions: usize) -> Self {
        Self { engine, dimensions }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn engine(&self) -> &StorageEngine {
        &self.engine
    }

    pub async fn get_chunk(&self, chunk_id: &str) -> Result<Option<IndexedChunk>, StorageError> {
        let chunk_id = chunk_id.to_string();
        self.engine
            .read(move |conn| chunk_ops::get_chunk(conn, &chunk_id))
            .await
    }

    pub async fn delete_chunk(&self, chunk_id: &str) -> Result<bool, StorageError> {
        let chunk_id = chunk_id.to_string();
        self.engine
            .write(move |conn| chunk_ops::delete_chunk(conn, &chunk_id))
            .await
    }

    pub async fn count(&self) -> Result<usize, StorageError> {
        self.engine.read(chunk_ops::count_chunks).await
    }

    /// Coverage audit. Logs a warning when the store is not fully consistent.
    pub async fn consistency_report(&self) -> Result<ConsistencyReport, StorageError> {
        let report = self.engine.read(chunk_ops::consistency_report).await?;
        if !report.is_consistent() {
            warn!(
                total = report.total_chunks,
                sparse_indexed = report.sparse_indexed,
                orphans = report.orphan_postings,
                coverage = report.sparse_coverage(),
                "dual-vector store is inconsistent"
            );
        }
        Ok(report)
    }
}

#[async_trait]
impl DualVectorStore for SqliteVectorStore {
    async fn upsert_chunk(
        &self,
        chunk_id: &str,
        dense: &[f32],
        sparse: &SparseVector,
        payload: &ChunkPayload,
    ) -> Result<(), StorageError> {
        if let Err(e) = chunk_ops::validate_chunk(chunk_id, dense, sparse, self.dimensions) {
            warn!(chunk_id, error = %e, "rejected chunk write");
            return Err(e);
        }
        let (id, dense, sparse, payload) = (
            chunk_id.to_string(),
            dense.to_vec(),
            sparse.clone(),
            payload.clone(),
        );
        self.engine
            .write(move |conn| chunk_ops::upsert_chunk(conn, &id, &dense, &sparse, &payload))
            .await?;
        debug!(chunk_id, "chunk upserted");
        Ok(())
    }

    async fn query_dense(
        &self,
        vector: &[f32],
        top_k: usize,
        namespace: Option<&str>,
    ) -> Result<Vec<ScoredChunk>, StorageError> {
        let vector = vector.to_vec();
        let namespace = namespace.map(str::to_string);
        self.engine
            .read(move |conn| {
                vector_search::search_dense(conn, &vector, top_k, namespace.as_deref())
            })
            .await
    }

    async fn query_sparse(
        &self,
        sparse: &SparseVector,
        top_k: usize,
        namespace: Option<&str>,
    ) -> Result<Vec<ScoredChunk>, StorageError> {
        let sparse = sparse.clone();
        let namespace = namespace.map(str::to_string);
        self.engine
            .read(move |conn| {
                vector_search::search_sparse(conn, &sparse, top_k, namespace.as_deref())
            })
            .await
    }
}
