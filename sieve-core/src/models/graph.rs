use serde::{Deserialize, Serialize};

/// A graph entity. Read-only from the retrieval side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_id: String,
    pub name: String,
    pub community_id: Option<String>,
}

/// Chunks reached by expanding one community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalExpansion {
    pub community_id: String,
    pub chunk_ids: Vec<String>,
}

/// A "mentioned-in" edge from an entity to a chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub entity_id: String,
    pub chunk_id: String,
}
