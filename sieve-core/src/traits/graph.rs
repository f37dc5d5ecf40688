use async_trait::async_trait;

use crate::errors::GraphError;
use crate::models::{Entity, GlobalExpansion, Mention};

/// Read side of the entity graph.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Entities whose name matches one of `terms` (case-insensitive).
    async fn resolve_entities(&self, terms: &[String]) -> Result<Vec<Entity>, GraphError>;

    /// "Mentioned-in" edges from the given entities, limited to `namespace`.
    async fn expand_local(
        &self,
        entity_ids: &[String],
        namespace: Option<&str>,
    ) -> Result<Vec<Mention>, GraphError>;

    /// Chunks mentioned by any entity of each community, one group per
    /// community in the order given.
    async fn expand_global(
        &self,
        community_ids: &[String],
        namespace: Option<&str>,
    ) -> Result<Vec<GlobalExpansion>, GraphError>;
}
