use serde::{Deserialize, Serialize};

/// Sparse vector as sorted, unique `(token_id, weight)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    entries: Vec<(u32, f32)>,
}

impl SparseVector {
    /// Build from arbitrary pairs. Duplicate token ids are summed,
    /// zero weights dropped.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, f32)>) -> Self {
        let mut entries: Vec<(u32, f32)> = pairs.into_iter().collect();
        entries.sort_by_key(|(id, _)| *id);
        let mut merged: Vec<(u32, f32)> = Vec::with_capacity(entries.len());
        for (id, w) in entries {
            match merged.last_mut() {
                Some((last, acc)) if *last == id => *acc += w,
                _ => merged.push((id, w)),
            }
        }
        merged.retain(|(_, w)| *w != 0.0);
        Self { entries: merged }
    }

    pub fn entries(&self) -> &[(u32, f32)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, token_id: u32) -> Option<f32> {
        self.entries
            .binary_search_by_key(&token_id, |(id, _)| *id)
            .ok()
            .map(|i| self.entries[i].1)
    }

    pub fn is_finite(&self) -> bool {
        self.entries.iter().all(|(_, w)| w.is_finite())
    }

    /// Dot product via a merge over both sorted lists.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j, mut acc) = (0, 0, 0.0f64);
        while i < self.entries.len() && j < other.entries.len() {
            let (a, wa) = self.entries[i];
            let (b, wb) = other.entries[j];
            match a.cmp(&b) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    acc += wa as f64 * wb as f64;
                    i += 1;
                    j += 1;
                }
            }
        }
        acc
    }
}

/// Dense and sparse vectors produced by a single embedding call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub dense: Vec<f32>,
    pub sparse: SparseVector,
}

impl Embedding {
    pub fn dimensions(&self) -> usize {
        self.dense.len()
    }
}
