//! The four retrieval channels. Each is stateless per query and maps
//! collaborator failures onto `ChannelError`, transient or permanent.

pub mod dense;
pub mod graph_global;
pub mod graph_local;
pub mod sparse;

pub use dense::DenseChannel;
pub use graph_global::GraphGlobalChannel;
pub use graph_local::GraphLocalChannel;
pub use sparse::SparseChannel;

use sieve_core::errors::{ChannelError, GraphError, StorageError};
use sieve_core::models::{ChannelKind, ChannelResult, ScoredChunk};

pub(crate) fn storage_failure(kind: ChannelKind, err: StorageError) -> ChannelError {
    if err.is_transient() {
        ChannelError::transient(kind, err.to_string())
    } else {
        ChannelError::permanent(kind, err.to_string())
    }
}

pub(crate) fn graph_failure(kind: ChannelKind, err: GraphError) -> ChannelError {
    if err.is_transient() {
        ChannelError::transient(kind, err.to_string())
    } else {
        ChannelError::permanent(kind, err.to_string())
    }
}

/// Store hits arrive best-first; ranks follow that order.
pub(crate) fn rank_hits(hits: Vec<ScoredChunk>) -> ChannelResult {
    ChannelResult::from_ordered(hits.into_iter().map(|h| h.chunk_id))
}
