//! SQLite-backed wiring: one storage engine shared by the vector store and
//! the graph store, plus the embedding engine used for both ingestion and
//! queries so chunk and query vectors come from the same provider.

use std::sync::Arc;

use tracing::{info, Instrument};

use sieve_core::config::SieveConfig;
use sieve_core::errors::SieveError;
use sieve_core::models::{ChunkPayload, Entity};
use sieve_core::traits::{DualVectorStore, EmbeddingProvider, IntentModel};
use sieve_embeddings::EmbeddingEngine;
use sieve_observability::ingest_span;
use sieve_storage::{SqliteGraphStore, SqliteVectorStore, StorageEngine};

use crate::engine::RetrievalEngine;

#[derive(Clone)]
pub struct SqliteBackends {
    pub vectors: SqliteVectorStore,
    pub graph: SqliteGraphStore,
    pub embedder: Arc<EmbeddingEngine>,
}

impl SqliteBackends {
    /// Open storage per `config.storage` (file-backed when `db_path` is set).
    pub fn open(config: &SieveConfig) -> Result<Self, SieveError> {
        let storage = StorageEngine::from_config(&config.storage)?;
        info!(
            path = config.storage.db_path.as_deref().unwrap_or(":memory:"),
            dimensions = config.embedding.dimensions,
            "sqlite backends opened"
        );
        Ok(Self {
            vectors: SqliteVectorStore::new(storage.clone(), config.embedding.dimensions),
            graph: SqliteGraphStore::new(storage),
            embedder: Arc::new(EmbeddingEngine::new(&config.embedding)),
        })
    }

    /// Embed `payload.text` once and write both vectors atomically.
    pub async fn ingest_chunk(&self, chunk_id: &str, payload: &ChunkPayload) -> Result<(), SieveError> {
        async {
            let embedding = self.embedder.embed(&payload.text).await?;
            self.vectors
                .upsert_chunk(chunk_id, &embedding.dense, &embedding.sparse, payload)
                .await?;
            Ok::<(), SieveError>(())
        }
        .instrument(ingest_span!(chunk_id))
        .await
    }

    /// Write an entity and its mentions. Mentions carry the namespace
    /// used by namespace-filtered graph expansion.
    pub async fn link_entity(
        &self,
        entity: &Entity,
        chunk_ids: &[&str],
        namespace: Option<&str>,
    ) -> Result<(), SieveError> {
        self.graph.upsert_entity(entity).await?;
        for chunk_id in chunk_ids {
            self.graph
                .add_mention(&entity.entity_id, chunk_id, namespace)
                .await?;
        }
        Ok(())
    }

    /// A retrieval engine over these backends.
    pub fn engine(
        &self,
        config: SieveConfig,
        model: Option<Arc<dyn IntentModel>>,
    ) -> Result<RetrievalEngine, SieveError> {
        RetrievalEngine::with_stores(
            config,
            self.embedder.clone(),
            Arc::new(self.vectors.clone()),
            Arc::new(self.graph.clone()),
            model,
        )
    }
}
