//! Dense channel: nearest neighbours on the shared query embedding.

use std::sync::Arc;

use async_trait::async_trait;

use sieve_core::errors::ChannelError;
use sieve_core::models::{ChannelKind, ChannelRequest, ChannelResult};
use sieve_core::traits::{ChannelExecutor, DualVectorStore};

use super::{rank_hits, storage_failure};

pub struct DenseChannel {
    store: Arc<dyn DualVectorStore>,
}

impl DenseChannel {
    pub fn new(store: Arc<dyn DualVectorStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ChannelExecutor for DenseChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Dense
    }

    async fn query(&self, request: &ChannelRequest) -> Result<ChannelResult, ChannelError> {
        let embedding = request
            .embedding
            .as_ref()
            .ok_or(ChannelError::MissingEmbedding {
                channel: ChannelKind::Dense,
            })?;
        let hits = self
            .store
            .query_dense(&embedding.dense, request.top_k, request.namespace.as_deref())
            .await
            .map_err(|e| storage_failure(ChannelKind::Dense, e))?;
        Ok(rank_hits(hits))
    }
}
