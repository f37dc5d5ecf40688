//! # sieve-retrieval
//!
//! The query engine. A query is classified once, fanned out to four
//! independent channels under a shared deadline, and the ranked lists
//! that come back in time are merged with intent-weighted RRF.
//!
//! ## Architecture
//!
//! ```text
//! RetrievalEngine
//! ├── IntentClassifier
//! │   ├── IntentModel (optional, hard timeout)
//! │   ├── Heuristic (quotes, identifiers, question words, length)
//! │   ├── moka cache (normalized query → intent)
//! │   └── WeightTable (intent → channel weights, hot-reloadable)
//! ├── EmbeddingProvider (one call, shared by dense + sparse)
//! ├── ChannelGuard × 4 (semaphore, soft timeout, retry, cancellation)
//! │   ├── DenseChannel        → DualVectorStore::query_dense
//! │   ├── SparseChannel       → DualVectorStore::query_sparse
//! │   ├── GraphLocalChannel   → entities → mentions → chunks
//! │   └── GraphGlobalChannel  → entities → communities → chunks
//! └── RRF Fusion (weighted, deterministic tie-break)
//! ```

pub mod backends;
pub mod channels;
pub mod engine;
pub mod execution;
pub mod fusion;
pub mod intent;
pub mod query_terms;

pub use backends::SqliteBackends;
pub use channels::{DenseChannel, GraphGlobalChannel, GraphLocalChannel, SparseChannel};
pub use engine::{ChannelSet, RetrievalEngine};
pub use execution::ChannelGuard;
pub use intent::{IntentClassifier, WeightTable};
