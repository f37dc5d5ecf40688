//! Graph-global channel: query terms → entities → communities.
//!
//! Communities rank by how many matched entities they hold (ties by id);
//! the top few are expanded to every chunk their entities mention, and each
//! chunk is tagged with the community it came through.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use sieve_core::errors::ChannelError;
use sieve_core::models::{ChannelKind, ChannelRequest, ChannelResult};
use sieve_core::traits::{ChannelExecutor, GraphStore};

use super::graph_failure;

pub struct GraphGlobalChannel {
    graph: Arc<dyn GraphStore>,
    top_communities: usize,
}

impl GraphGlobalChannel {
    pub fn new(graph: Arc<dyn GraphStore>, top_communities: usize) -> Self {
        Self {
            graph,
            top_communities: top_communities.max(1),
        }
    }
}

#[async_trait]
impl ChannelExecutor for GraphGlobalChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::GraphGlobal
    }

    async fn query(&self, request: &ChannelRequest) -> Result<ChannelResult, ChannelError> {
        let fail = |e| graph_failure(ChannelKind::GraphGlobal, e);
        if request.terms.is_empty() {
            return Ok(ChannelResult::empty());
        }

        let entities = self.graph.resolve_entities(&request.terms).await.map_err(fail)?;
        let mut matches: BTreeMap<String, usize> = BTreeMap::new();
        for entity in entities {
            if let Some(community) = entity.community_id {
                *matches.entry(community).or_default() += 1;
            }
        }
        if matches.is_empty() {
            return Ok(ChannelResult::empty());
        }

        let mut communities: Vec<(String, usize)> = matches.into_iter().collect();
        communities.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        communities.truncate(self.top_communities);
        let community_ids: Vec<String> = communities.into_iter().map(|(id, _)| id).collect();
        debug!(communities = ?community_ids, "graph-global communities selected");

        let expansions = self
            .graph
            .expand_global(&community_ids, request.namespace.as_deref())
            .await
            .map_err(fail)?;

        // Keep the community order chosen above regardless of store order.
        let mut by_community: BTreeMap<String, Vec<String>> = expansions
            .into_iter()
            .map(|e| (e.community_id, e.chunk_ids))
            .collect();
        let tagged = community_ids.iter().flat_map(|community| {
            let mut chunks = by_community.remove(community).unwrap_or_default();
            chunks.sort();
            chunks
                .into_iter()
                .map(move |chunk| (chunk, Some(community.clone())))
        });

        let mut result = ChannelResult::from_tagged(tagged.collect::<Vec<_>>());
        result.truncate(request.top_k);
        Ok(result)
    }
}
