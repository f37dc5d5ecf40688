//! Graph-local channel: query terms → entities → mentioned-in chunks.
//!
//! A chunk scores by how many distinct matched entities link to it; ties
//! break by chunk id.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use sieve_core::errors::ChannelError;
use sieve_core::models::{ChannelKind, ChannelRequest, ChannelResult};
use sieve_core::traits::{ChannelExecutor, GraphStore};

use super::graph_failure;

pub struct GraphLocalChannel {
    graph: Arc<dyn GraphStore>,
}

impl GraphLocalChannel {
    pub fn new(graph: Arc<dyn GraphStore>) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl ChannelExecutor for GraphLocalChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::GraphLocal
    }

    async fn query(&self, request: &ChannelRequest) -> Result<ChannelResult, ChannelError> {
        let fail = |e| graph_failure(ChannelKind::GraphLocal, e);
        if request.terms.is_empty() {
            return Ok(ChannelResult::empty());
        }

        let entities = self.graph.resolve_entities(&request.terms).await.map_err(fail)?;
        if entities.is_empty() {
            return Ok(ChannelResult::empty());
        }
        let entity_ids: Vec<String> = entities.into_iter().map(|e| e.entity_id).collect();
        debug!(matched = entity_ids.len(), "graph-local entities resolved");

        let mentions = self
            .graph
            .expand_local(&entity_ids, request.namespace.as_deref())
            .await
            .map_err(fail)?;

        let mut linked: HashMap<String, BTreeSet<String>> = HashMap::new();
        for mention in mentions {
            linked
                .entry(mention.chunk_id)
                .or_default()
                .insert(mention.entity_id);
        }

        let mut scored: Vec<(String, usize)> = linked
            .into_iter()
            .map(|(chunk_id, entities)| (chunk_id, entities.len()))
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scored.truncate(request.top_k);

        Ok(ChannelResult::from_ordered(scored.into_iter().map(|(id, _)| id)))
    }
}
