//! Feature-hashing provider.
//!
//! Terms are hashed into fixed dense buckets and into a larger sparse id
//! space, weighted by term frequency with a length-based IDF approximation.
//! Deterministic and always available.

use std::collections::HashMap;

use async_trait::async_trait;

use sieve_core::errors::EmbeddingError;
use sieve_core::models::{Embedding, SparseVector};
use sieve_core::traits::EmbeddingProvider;

use crate::tokenize::{hash_term, tokenize};

pub struct HashingEmbedder {
    dimensions: usize,
    sparse_buckets: u32,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize, sparse_buckets: u32) -> Self {
        Self {
            dimensions: dimensions.max(1),
            sparse_buckets: sparse_buckets.max(1),
        }
    }

    /// Sparse token id for a term.
    pub fn token_id(&self, term: &str) -> u32 {
        (hash_term(term) % self.sparse_buckets as u64) as u32
    }

    /// Dense and sparse vectors for `text`, both L2-normalized.
    pub fn embed_sync(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let mut tf: HashMap<&str, f32> = HashMap::new();
        for tok in &tokens {
            *tf.entry(tok.as_str()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        let mut dense = vec![0.0f32; self.dimensions];
        let mut sparse = Vec::with_capacity(tf.len());
        for (term, count) in &tf {
            // Short terms are usually stopwords.
            let idf = 1.0 + (term.chars().count() as f32).ln();
            let weight = (count / total) * idf;
            let h = hash_term(term);
            dense[(h % self.dimensions as u64) as usize] += weight;
            sparse.push(((h % self.sparse_buckets as u64) as u32, weight));
        }

        l2_normalize(&mut dense);
        let mut sparse = SparseVector::from_pairs(sparse);
        let norm: f32 = sparse
            .entries()
            .iter()
            .map(|(_, w)| w * w)
            .sum::<f32>()
            .sqrt();
        if norm > f32::EPSILON {
            sparse = SparseVector::from_pairs(sparse.entries().iter().map(|(t, w)| (*t, w / norm)));
        }

        Ok(Embedding { dense, sparse })
    }
}

fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        self.embed_sync(text)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashing"
    }
}
