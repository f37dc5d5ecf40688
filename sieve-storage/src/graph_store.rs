//! `GraphStore` over SQLite.

use async_trait::async_trait;

use sieve_core::errors::{GraphError, StorageError};
use sieve_core::models::{Entity, GlobalExpansion, Mention};
use sieve_core::traits::GraphStore;

use crate::engine::StorageEngine;
use crate::queries::graph_ops;

#[derive(Clone)]
pub struct SqliteGraphStore {
    engine: StorageEngine,
}

impl SqliteGraphStore {
    pub fn new(engine: StorageEngine) -> Self {
        Self { engine }
    }

    pub async fn upsert_entity(&self, entity: &Entity) -> Result<(), StorageError> {
        let entity = entity.clone();
        self.engine
            .write(move |conn| graph_ops::upsert_entity(conn, &entity))
            .await
    }

    pub async fn add_mention(
        &self,
        entity_id: &str,
        chunk_id: &str,
        namespace: Option<&str>,
    ) -> Result<(), StorageError> {
        let (entity_id, chunk_id) = (entity_id.to_string(), chunk_id.to_string());
        let namespace = namespace.map(str::to_string);
        self.engine
            .write(move |conn| {
                graph_ops::add_mention(conn, &entity_id, &chunk_id, namespace.as_deref())
            })
            .await
    }
}

#[async_trait]
impl GraphStore for SqliteGraphStore {
    async fn resolve_entities(&self, terms: &[String]) -> Result<Vec<Entity>, GraphError> {
        let terms = terms.to_vec();
        Ok(self
            .engine
            .read(move |conn| graph_ops::resolve_entities(conn, &terms))
            .await?)
    }

    async fn expand_local(
        &self,
        entity_ids: &[String],
        namespace: Option<&str>,
    ) -> Result<Vec<Mention>, GraphError> {
        let entity_ids = entity_ids.to_vec();
        let namespace = namespace.map(str::to_string);
        Ok(self
            .engine
            .read(move |conn| graph_ops::expand_local(conn, &entity_ids, namespace.as_deref()))
            .await?)
    }

    async fn expand_global(
        &self,
        community_ids: &[String],
        namespace: Option<&str>,
    ) -> Result<Vec<GlobalExpansion>, GraphError> {
        let community_ids = community_ids.to_vec();
        let namespace = namespace.map(str::to_string);
        Ok(self
            .engine
            .read(move |conn| {
                graph_ops::expand_global(conn, &community_ids, namespace.as_deref())
            })
            .await?)
    }
}
