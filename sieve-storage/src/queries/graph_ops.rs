//! Entity graph reads and seeding writes.

use std::collections::BTreeMap;

use rusqlite::{params, Connection};

use sieve_core::errors::StorageError;
use sieve_core::models::{Entity, GlobalExpansion, Mention};

use crate::to_storage_err;

pub fn upsert_entity(conn: &Connection, entity: &Entity) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO entities (entity_id, name, name_lower, community_id)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(entity_id) DO UPDATE SET
            name = excluded.name,
            name_lower = excluded.name_lower,
            community_id = excluded.community_id",
        params![
            entity.entity_id,
            entity.name,
            entity.name.trim().to_lowercase(),
            entity.community_id
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn add_mention(
    conn: &Connection,
    entity_id: &str,
    chunk_id: &str,
    namespace: Option<&str>,
) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO mentions (entity_id, chunk_id, namespace) VALUES (?1, ?2, ?3)
         ON CONFLICT(entity_id, chunk_id) DO UPDATE SET namespace = excluded.namespace",
        params![entity_id, chunk_id, namespace],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Case-insensitive exact name match. Sorted by entity id.
pub fn resolve_entities(conn: &Connection, terms: &[String]) -> Result<Vec<Entity>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT entity_id, name, community_id FROM entities WHERE name_lower = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut found: BTreeMap<String, Entity> = BTreeMap::new();
    for term in terms {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            continue;
        }
        let rows = stmt
            .query_map(params![term], |row| {
                Ok(Entity {
                    entity_id: row.get(0)?,
                    name: row.get(1)?,
                    community_id: row.get(2)?,
                })
            })
            .map_err(|e| to_storage_err(e.to_string()))?;
        for row in rows {
            let entity = row.map_err(|e| to_storage_err(e.to_string()))?;
            found.entry(entity.entity_id.clone()).or_insert(entity);
        }
    }
    Ok(found.into_values().collect())
}

pub fn expand_local(
    conn: &Connection,
    entity_ids: &[String],
    namespace: Option<&str>,
) -> Result<Vec<Mention>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT entity_id, chunk_id FROM mentions
             WHERE entity_id = ?1 AND (?2 IS NULL OR namespace = ?2)
             ORDER BY chunk_id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut mentions = Vec::new();
    for entity_id in entity_ids {
        let rows = stmt
            .query_map(params![entity_id, namespace], |row| {
                Ok(Mention {
                    entity_id: row.get(0)?,
                    chunk_id: row.get(1)?,
                })
            })
            .map_err(|e| to_storage_err(e.to_string()))?;
        for row in rows {
            mentions.push(row.map_err(|e| to_storage_err(e.to_string()))?);
        }
    }
    Ok(mentions)
}

pub fn expand_global(
    conn: &Connection,
    community_ids: &[String],
    namespace: Option<&str>,
) -> Result<Vec<GlobalExpansion>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT DISTINCT m.chunk_id FROM mentions m
             JOIN entities e ON e.entity_id = m.entity_id
             WHERE e.community_id = ?1 AND (?2 IS NULL OR m.namespace = ?2)
             ORDER BY m.chunk_id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut expansions = Vec::with_capacity(community_ids.len());
    for community_id in community_ids {
        let chunk_ids = stmt
            .query_map(params![community_id, namespace], |row| row.get::<_, String>(0))
            .map_err(|e| to_storage_err(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| to_storage_err(e.to_string()))?;
        expansions.push(GlobalExpansion {
            community_id: community_id.clone(),
            chunk_ids,
        });
    }
    Ok(expansions)
}
