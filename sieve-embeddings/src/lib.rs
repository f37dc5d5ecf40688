//! # sieve-embeddings
//!
//! One embedding call yields both the dense and the sparse vector, so the
//! two channels that consume them never disagree about the text they saw.
//!
//! ```text
//! EmbeddingEngine
//!   ├── EmbeddingCache (moka, blake3 keys)
//!   └── DegradationChain: primary provider → HashingEmbedder
//! ```

pub mod cache;
pub mod degradation;
pub mod engine;
pub mod providers;
pub mod tokenize;

pub use cache::EmbeddingCache;
pub use degradation::DegradationChain;
pub use engine::EmbeddingEngine;
pub use providers::HashingEmbedder;
