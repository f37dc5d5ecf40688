//! v001: chunks with co-located dense + sparse vectors, sparse inverted index.
//!
//! Both vector columns are NOT NULL and non-empty, so a row can never hold
//! only one of them.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS chunks (
    chunk_id       TEXT PRIMARY KEY,
    text           TEXT NOT NULL,
    source_doc_id  TEXT NOT NULL,
    community_id   TEXT,
    namespace      TEXT,
    dense          BLOB NOT NULL CHECK (length(dense) > 0),
    dense_dims     INTEGER NOT NULL CHECK (dense_dims > 0),
    sparse         BLOB NOT NULL CHECK (length(sparse) > 0),
    sparse_len     INTEGER NOT NULL CHECK (sparse_len > 0),
    updated_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_chunks_namespace ON chunks(namespace);

CREATE TABLE IF NOT EXISTS sparse_postings (
    token_id  INTEGER NOT NULL,
    chunk_id  TEXT NOT NULL REFERENCES chunks(chunk_id) ON DELETE CASCADE,
    weight    REAL NOT NULL,
    PRIMARY KEY (token_id, chunk_id)
);

CREATE INDEX IF NOT EXISTS idx_postings_chunk ON sparse_postings(chunk_id);
";
