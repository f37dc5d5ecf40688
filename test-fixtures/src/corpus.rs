//! Corpus fixtures: chunks, entities and mentions, plus a seeding helper.

use serde::Deserialize;

use sieve_core::errors::SieveError;
use sieve_core::models::{ChunkPayload, Entity};
use sieve_core::traits::{DualVectorStore, EmbeddingProvider};
use sieve_storage::{SqliteGraphStore, SqliteVectorStore};

#[derive(Debug, Clone, Deserialize)]
pub struct CorpusChunk {
    pub chunk_id: String,
    pub text: String,
    pub source_doc_id: String,
    #[serde(default)]
    pub community_id: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorpusMention {
    pub entity_id: String,
    pub chunk_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Corpus {
    pub chunks: Vec<CorpusChunk>,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub mentions: Vec<CorpusMention>,
}

impl Corpus {
    /// Load `corpus/<name>.json`.
    pub fn load(name: &str) -> Self {
        crate::load_fixture(&format!("corpus/{name}.json"))
    }

    pub fn chunk(&self, chunk_id: &str) -> Option<&CorpusChunk> {
        self.chunks.iter().find(|c| c.chunk_id == chunk_id)
    }
}

/// Embed and write every chunk, then the entity graph. Mentions inherit the
/// namespace of the chunk they point at.
pub async fn seed_corpus(
    corpus: &Corpus,
    vectors: &SqliteVectorStore,
    graph: &SqliteGraphStore,
    embedder: &dyn EmbeddingProvider,
) -> Result<(), SieveError> {
    for chunk in &corpus.chunks {
        let embedding = embedder.embed(&chunk.text).await?;
        let payload = ChunkPayload {
            text: chunk.text.clone(),
            source_doc_id: chunk.source_doc_id.clone(),
            community_id: chunk.community_id.clone(),
            namespace: chunk.namespace.clone(),
        };
        vectors
            .upsert_chunk(&chunk.chunk_id, &embedding.dense, &embedding.sparse, &payload)
            .await?;
    }
    for entity in &corpus.entities {
        graph.upsert_entity(entity).await?;
    }
    for mention in &corpus.mentions {
        let namespace = corpus
            .chunk(&mention.chunk_id)
            .and_then(|c| c.namespace.as_deref());
        graph
            .add_mention(&mention.entity_id, &mention.chunk_id, namespace)
            .await?;
    }
    Ok(())
}
