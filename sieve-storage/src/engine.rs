//! StorageEngine: owns the connection pool and moves blocking SQLite work
//! off the async executor.

use std::path::Path;
use std::sync::Arc;

use rusqlite::Connection;

use sieve_core::config::StorageConfig;
use sieve_core::errors::StorageError;

use crate::pool::ConnectionPool;

/// Shared handle to the database. Cheap to clone.
#[derive(Clone)]
pub struct StorageEngine {
    pool: Arc<ConnectionPool>,
    /// File-backed: reads use the read pool. In-memory: reads go through
    /// the writer because separate in-memory connections are separate databases.
    use_read_pool: bool,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path, config: &StorageConfig) -> Result<Self, StorageError> {
        let pool = ConnectionPool::open(path, config)?;
        Ok(Self {
            pool: Arc::new(pool),
            use_read_pool: true,
        })
    }

    /// Open an in-memory storage engine.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let pool = ConnectionPool::open_in_memory(&StorageConfig::default())?;
        Ok(Self {
            pool: Arc::new(pool),
            use_read_pool: false,
        })
    }

    /// Open according to config: `db_path` set means file-backed.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        match &config.db_path {
            Some(path) => Self::open(Path::new(path), config),
            None => {
                let pool = ConnectionPool::open_in_memory(config)?;
                Ok(Self {
                    pool: Arc::new(pool),
                    use_read_pool: false,
                })
            }
        }
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Run `f` on the write connection in a blocking task.
    pub async fn write<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = Arc::clone(&self.pool);
        tokio::task::spawn_blocking(move || pool.writer.with_conn_sync(f))
            .await
            .map_err(|e| StorageError::TaskFailed {
                reason: e.to_string(),
            })?
    }

    /// Run `f` on the best available read connection in a blocking task.
    pub async fn read<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = Arc::clone(&self.pool);
        let use_read_pool = self.use_read_pool;
        tokio::task::spawn_blocking(move || {
            if use_read_pool {
                pool.readers.with_conn(f)
            } else {
                pool.writer.with_conn_sync(f)
            }
        })
        .await
        .map_err(|e| StorageError::TaskFailed {
            reason: e.to_string(),
        })?
    }
}
