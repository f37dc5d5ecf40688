//! Sparse channel: lexical match on the sparse half of the same embedding
//! the dense channel uses.

use std::sync::Arc;

use async_trait::async_trait;

use sieve_core::errors::ChannelError;
use sieve_core::models::{ChannelKind, ChannelRequest, ChannelResult};
use sieve_core::traits::{ChannelExecutor, DualVectorStore};

use super::{rank_hits, storage_failure};

pub struct SparseChannel {
    store: Arc<dyn DualVectorStore>,
}

impl SparseChannel {
    pub fn new(store: Arc<dyn DualVectorStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ChannelExecutor for SparseChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Sparse
    }

    async fn query(&self, request: &ChannelRequest) -> Result<ChannelResult, ChannelError> {
        let embedding = request
            .embedding
            .as_ref()
            .ok_or(ChannelError::MissingEmbedding {
                channel: ChannelKind::Sparse,
            })?;
        let hits = self
            .store
            .query_sparse(&embedding.sparse, request.top_k, request.namespace.as_deref())
            .await
            .map_err(|e| storage_failure(ChannelKind::Sparse, e))?;
        Ok(rank_hits(hits))
    }
}
