//! Chunk writes and reads. Dense vector, sparse vector, payload and sparse
//! postings for one chunk always change together inside one SAVEPOINT.

use rusqlite::{params, Connection, OptionalExtension};

use sieve_core::errors::StorageError;
use sieve_core::models::{ChunkPayload, ConsistencyReport, IndexedChunk, SparseVector};

use super::codec::{bytes_to_f32_vec, bytes_to_sparse, f32_vec_to_bytes, sparse_to_bytes};
use crate::to_storage_err;

fn inconsistent(chunk_id: &str, reason: impl Into<String>) -> StorageError {
    StorageError::WriteInconsistency {
        chunk_id: chunk_id.to_string(),
        reason: reason.into(),
    }
}

/// Reject any write that could leave a chunk with only one usable vector.
pub fn validate_chunk(
    chunk_id: &str,
    dense: &[f32],
    sparse: &SparseVector,
    dimensions: usize,
) -> Result<(), StorageError> {
    if chunk_id.trim().is_empty() {
        return Err(inconsistent(chunk_id, "chunk id is empty"));
    }
    if dense.is_empty() {
        return Err(inconsistent(chunk_id, "dense vector is empty"));
    }
    if sparse.is_empty() {
        return Err(inconsistent(chunk_id, "sparse vector is empty"));
    }
    if dense.len() != dimensions {
        return Err(inconsistent(
            chunk_id,
            format!("dense dimension {} != store dimension {dimensions}", dense.len()),
        ));
    }
    if !dense.iter().all(|v| v.is_finite()) {
        return Err(inconsistent(chunk_id, "dense vector has non-finite values"));
    }
    if !sparse.is_finite() {
        return Err(inconsistent(chunk_id, "sparse vector has non-finite values"));
    }
    Ok(())
}

/// Insert or wholesale replace a chunk, atomically.
pub fn upsert_chunk(
    conn: &Connection,
    chunk_id: &str,
    dense: &[f32],
    sparse: &SparseVector,
    payload: &ChunkPayload,
) -> Result<(), StorageError> {
    conn.execute_batch("SAVEPOINT upsert_chunk")
        .map_err(|e| to_storage_err(format!("upsert_chunk savepoint: {e}")))?;

    match upsert_chunk_inner(conn, chunk_id, dense, sparse, payload) {
        Ok(()) => {
            conn.execute_batch("RELEASE upsert_chunk")
                .map_err(|e| to_storage_err(format!("upsert_chunk release: {e}")))?;
            Ok(())
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK TO upsert_chunk");
            let _ = conn.execute_batch("RELEASE upsert_chunk");
            Err(e)
        }
    }
}

fn upsert_chunk_inner(
    conn: &Connection,
    chunk_id: &str,
    dense: &[f32],
    sparse: &SparseVector,
    payload: &ChunkPayload,
) -> Result<(), StorageError> {
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO chunks (chunk_id, text, source_doc_id, community_id, namespace,
                             dense, dense_dims, sparse, sparse_len, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(chunk_id) DO UPDATE SET
            text = excluded.text,
            source_doc_id = excluded.source_doc_id,
            community_id = excluded.community_id,
            namespace = excluded.namespace,
            dense = excluded.dense,
            dense_dims = excluded.dense_dims,
            sparse = excluded.sparse,
            sparse_len = excluded.sparse_len,
            updated_at = excluded.updated_at",
        params![
            chunk_id,
            payload.text,
            payload.source_doc_id,
            payload.community_id,
            payload.namespace,
            f32_vec_to_bytes(dense),
            dense.len() as i64,
            sparse_to_bytes(sparse),
            sparse.len() as i64,
            now,
        ],
    )
    .map_err(|e| inconsistent(chunk_id, format!("chunk row write failed: {e}")))?;

    conn.execute(
        "DELETE FROM sparse_postings WHERE chunk_id = ?1",
        params![chunk_id],
    )
    .map_err(|e| inconsistent(chunk_id, format!("clearing postings failed: {e}")))?;

    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO sparse_postings (token_id, chunk_id, weight) VALUES (?1, ?2, ?3)",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    for (token, weight) in sparse.entries() {
        stmt.execute(params![*token as i64, chunk_id, *weight as f64])
            .map_err(|e| inconsistent(chunk_id, format!("posting write failed: {e}")))?;
    }

    let written: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sparse_postings WHERE chunk_id = ?1",
            params![chunk_id],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if written as usize != sparse.len() {
        return Err(inconsistent(
            chunk_id,
            format!("{written} postings written for {} sparse entries", sparse.len()),
        ));
    }
    Ok(())
}

/// Fetch a full chunk by id.
pub fn get_chunk(conn: &Connection, chunk_id: &str) -> Result<Option<IndexedChunk>, StorageError> {
    let row = conn
        .query_row(
            "SELECT text, source_doc_id, community_id, namespace, dense, sparse
             FROM chunks WHERE chunk_id = ?1",
            params![chunk_id],
            |row| {
                Ok((
                    ChunkPayload {
                        text: row.get(0)?,
                        source_doc_id: row.get(1)?,
                        community_id: row.get(2)?,
                        namespace: row.get(3)?,
                    },
                    row.get::<_, Vec<u8>>(4)?,
                    row.get::<_, Vec<u8>>(5)?,
                ))
            },
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    match row {
        None => Ok(None),
        Some((payload, dense, sparse)) => Ok(Some(IndexedChunk {
            chunk_id: chunk_id.to_string(),
            dense: bytes_to_f32_vec(&dense, chunk_id)?,
            sparse: bytes_to_sparse(&sparse, chunk_id)?,
            payload,
        })),
    }
}

/// Remove a chunk and its postings. Returns whether a row existed.
pub fn delete_chunk(conn: &Connection, chunk_id: &str) -> Result<bool, StorageError> {
    conn.execute_batch("SAVEPOINT delete_chunk")
        .map_err(|e| to_storage_err(format!("delete_chunk savepoint: {e}")))?;

    let result = conn
        .execute(
            "DELETE FROM sparse_postings WHERE chunk_id = ?1",
            params![chunk_id],
        )
        .and_then(|_| conn.execute("DELETE FROM chunks WHERE chunk_id = ?1", params![chunk_id]));

    match result {
        Ok(n) => {
            conn.execute_batch("RELEASE delete_chunk")
                .map_err(|e| to_storage_err(format!("delete_chunk release: {e}")))?;
            Ok(n > 0)
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK TO delete_chunk");
            let _ = conn.execute_batch("RELEASE delete_chunk");
            Err(to_storage_err(e.to_string()))
        }
    }
}

pub fn count_chunks(conn: &Connection) -> Result<usize, StorageError> {
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(n as usize)
}

/// Audit dense/sparse coverage across the whole store.
pub fn consistency_report(conn: &Connection) -> Result<ConsistencyReport, StorageError> {
    let count = |sql: &str| -> Result<usize, StorageError> {
        conn.query_row(sql, [], |row| row.get::<_, i64>(0))
            .map(|n| n as usize)
            .map_err(|e| to_storage_err(e.to_string()))
    };

    Ok(ConsistencyReport {
        total_chunks: count("SELECT COUNT(*) FROM chunks")?,
        dense_present: count(
            "SELECT COUNT(*) FROM chunks WHERE length(dense) > 0 AND dense_dims > 0",
        )?,
        sparse_present: count(
            "SELECT COUNT(*) FROM chunks WHERE length(sparse) > 0 AND sparse_len > 0",
        )?,
        sparse_indexed: count(
            "SELECT COUNT(DISTINCT p.chunk_id) FROM sparse_postings p
             JOIN chunks c ON c.chunk_id = p.chunk_id",
        )?,
        orphan_postings: count(
            "SELECT COUNT(*) FROM sparse_postings p
             WHERE NOT EXISTS (SELECT 1 FROM chunks c WHERE c.chunk_id = p.chunk_id)",
        )?,
    })
}
