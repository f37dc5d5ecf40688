//! Connection pool managing read/write connections.

pub mod pragmas;
pub mod read_pool;
pub mod write_connection;

use std::path::{Path, PathBuf};

use sieve_core::config::StorageConfig;
use sieve_core::errors::StorageError;

pub use read_pool::ReadPool;
pub use write_connection::WriteConnection;

/// Manages the single write connection and the read connection pool.
pub struct ConnectionPool {
    pub writer: WriteConnection,
    pub readers: ReadPool,
    pub db_path: Option<PathBuf>,
}

impl ConnectionPool {
    /// Open a connection pool for the given database file.
    /// The writer opens (and migrates) first so readers see the schema.
    pub fn open(path: &Path, config: &StorageConfig) -> Result<Self, StorageError> {
        let writer = WriteConnection::open(path, config)?;
        let readers = ReadPool::open(path, config.read_pool_size, config)?;
        Ok(Self {
            writer,
            readers,
            db_path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory pool. Readers would be isolated databases, so the
    /// pool has none; callers route reads through the writer.
    pub fn open_in_memory(config: &StorageConfig) -> Result<Self, StorageError> {
        Ok(Self {
            writer: WriteConnection::open_in_memory(config)?,
            readers: ReadPool::empty(),
            db_path: None,
        })
    }
}
