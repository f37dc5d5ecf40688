//! # sieve-storage
//!
//! SQLite reference implementations of the dual-vector store and the graph store.
//!
//! ```text
//! StorageEngine (writer + read pool, migrations)
//!   ├── SqliteVectorStore   chunks + sparse_postings, one SAVEPOINT per upsert
//!   └── SqliteGraphStore    entities + mentions
//! ```

pub mod engine;
pub mod graph_store;
pub mod migrations;
pub mod pool;
pub mod queries;
pub mod vector_store;

pub use engine::StorageEngine;
pub use graph_store::SqliteGraphStore;
pub use vector_store::SqliteVectorStore;

use sieve_core::errors::StorageError;

/// Wrap a rusqlite (or any) error message as a `StorageError`.
pub(crate) fn to_storage_err(message: impl Into<String>) -> StorageError {
    StorageError::SqliteError {
        message: message.into(),
    }
}
