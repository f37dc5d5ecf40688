//! Similarity search over the chunks table.
//!
//! Dense search is a brute-force cosine scan. Sparse search walks the
//! inverted index for the query's tokens only.

use std::collections::HashMap;

use rusqlite::{params, Connection};

use sieve_core::errors::StorageError;
use sieve_core::models::{ScoredChunk, SparseVector};

use super::codec::{bytes_to_f32_vec, cosine_similarity};
use crate::to_storage_err;

/// Sort by score descending, chunk id ascending, then keep `top_k`.
fn rank(scored: HashMap<String, f64>, top_k: usize) -> Vec<ScoredChunk> {
    let mut ranked: Vec<ScoredChunk> = scored
        .into_iter()
        .map(|(chunk_id, score)| ScoredChunk { chunk_id, score })
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.chunk_id.cmp(&b.chunk_id))
    });
    ranked.truncate(top_k);
    ranked
}

/// Top-k chunks by cosine similarity to `query`. Non-positive similarities are dropped.
pub fn search_dense(
    conn: &Connection,
    query: &[f32],
    top_k: usize,
    namespace: Option<&str>,
) -> Result<Vec<ScoredChunk>, StorageError> {
    let query_norm_sq: f64 = query.iter().map(|x| (*x as f64) * (*x as f64)).sum();
    if query_norm_sq == 0.0 || top_k == 0 {
        return Ok(vec![]);
    }

    let mut stmt = conn
        .prepare_cached(
            "SELECT chunk_id, dense, dense_dims FROM chunks
             WHERE (?1 IS NULL OR namespace = ?1)",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![namespace], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Vec<u8>>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut scored = HashMap::new();
    for row in rows {
        let (chunk_id, blob, dims) = row.map_err(|e| to_storage_err(e.to_string()))?;
        // Skip dimension mismatches without decoding.
        if dims as usize != query.len() {
            continue;
        }
        let stored = bytes_to_f32_vec(&blob, &chunk_id)?;
        let sim = cosine_similarity(query, &stored);
        if sim > 0.0 {
            scored.insert(chunk_id, sim);
        }
    }
    Ok(rank(scored, top_k))
}

/// Top-k chunks by sparse dot product with `query`.
pub fn search_sparse(
    conn: &Connection,
    query: &SparseVector,
    top_k: usize,
    namespace: Option<&str>,
) -> Result<Vec<ScoredChunk>, StorageError> {
    if query.is_empty() || top_k == 0 {
        return Ok(vec![]);
    }

    let mut stmt = conn
        .prepare_cached(
            "SELECT p.chunk_id, p.weight FROM sparse_postings p
             JOIN chunks c ON c.chunk_id = p.chunk_id
             WHERE p.token_id = ?1 AND (?2 IS NULL OR c.namespace = ?2)",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut scored: HashMap<String, f64> = HashMap::new();
    for (token, query_weight) in query.entries() {
        let rows = stmt
            .query_map(params![*token as i64, namespace], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })
            .map_err(|e| to_storage_err(e.to_string()))?;
        for row in rows {
            let (chunk_id, weight) = row.map_err(|e| to_storage_err(e.to_string()))?;
            *scored.entry(chunk_id).or_insert(0.0) += weight * *query_weight as f64;
        }
    }
    scored.retain(|_, s| *s > 0.0);
    Ok(rank(scored, top_k))
}
