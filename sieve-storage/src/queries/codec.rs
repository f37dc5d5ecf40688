//! Blob encodings for stored vectors (little-endian).

use sieve_core::errors::StorageError;
use sieve_core::models::SparseVector;

/// Convert f32 slice to bytes.
pub fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert bytes back to an f32 vec.
pub fn bytes_to_f32_vec(bytes: &[u8], chunk_id: &str) -> Result<Vec<f32>, StorageError> {
    if bytes.len() % 4 != 0 {
        return Err(StorageError::CorruptVector {
            chunk_id: chunk_id.to_string(),
            details: format!("dense blob length {} is not a multiple of 4", bytes.len()),
        });
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Encode a sparse vector as `(u32 token, f32 weight)` pairs.
pub fn sparse_to_bytes(v: &SparseVector) -> Vec<u8> {
    let mut out = Vec::with_capacity(v.len() * 8);
    for (token, weight) in v.entries() {
        out.extend_from_slice(&token.to_le_bytes());
        out.extend_from_slice(&weight.to_le_bytes());
    }
    out
}

pub fn bytes_to_sparse(bytes: &[u8], chunk_id: &str) -> Result<SparseVector, StorageError> {
    if bytes.len() % 8 != 0 {
        return Err(StorageError::CorruptVector {
            chunk_id: chunk_id.to_string(),
            details: format!("sparse blob length {} is not a multiple of 8", bytes.len()),
        });
    }
    Ok(SparseVector::from_pairs(bytes.chunks_exact(8).map(|c| {
        (
            u32::from_le_bytes([c[0], c[1], c[2], c[3]]),
            f32::from_le_bytes([c[4], c[5], c[6], c[7]]),
        )
    })))
}

/// Cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
