use serde::{Deserialize, Serialize};

/// Text and metadata stored alongside a chunk's vectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkPayload {
    pub text: String,
    pub source_doc_id: String,
    #[serde(default)]
    pub community_id: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
}

/// A chunk as persisted by the dual-vector store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedChunk {
    pub chunk_id: String,
    pub dense: Vec<f32>,
    pub sparse: super::SparseVector,
    pub payload: ChunkPayload,
}

/// A similarity hit from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk_id: String,
    pub score: f64,
}

/// Coverage audit of the dual-vector store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub total_chunks: usize,
    /// Chunks with a non-empty dense vector.
    pub dense_present: usize,
    /// Chunks with a non-empty sparse vector.
    pub sparse_present: usize,
    /// Chunks with at least one row in the sparse inverted index.
    pub sparse_indexed: usize,
    /// Postings whose chunk no longer exists.
    pub orphan_postings: usize,
}

impl ConsistencyReport {
    /// Both vectors and postings present for every chunk, no orphans.
    pub fn is_consistent(&self) -> bool {
        self.dense_present == self.total_chunks
            && self.sparse_present == self.total_chunks
            && self.sparse_indexed == self.total_chunks
            && self.orphan_postings == 0
    }

    /// Fraction of chunks reachable through the sparse index.
    pub fn sparse_coverage(&self) -> f64 {
        if self.total_chunks == 0 {
            return 1.0;
        }
        self.sparse_indexed as f64 / self.total_chunks as f64
    }
}
