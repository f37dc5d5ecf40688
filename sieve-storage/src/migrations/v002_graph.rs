//! v002: entity graph (entities + mentioned-in edges).

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS entities (
    entity_id     TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    name_lower    TEXT NOT NULL,
    community_id  TEXT
);

CREATE INDEX IF NOT EXISTS idx_entities_name ON entities(name_lower);
CREATE INDEX IF NOT EXISTS idx_entities_community ON entities(community_id);

CREATE TABLE IF NOT EXISTS mentions (
    entity_id  TEXT NOT NULL REFERENCES entities(entity_id) ON DELETE CASCADE,
    chunk_id   TEXT NOT NULL,
    namespace  TEXT,
    PRIMARY KEY (entity_id, chunk_id)
);

CREATE INDEX IF NOT EXISTS idx_mentions_chunk ON mentions(chunk_id);
";
