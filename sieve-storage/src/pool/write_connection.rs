//! Single write connection. Serialized writes, no contention.

use std::path::Path;

use rusqlite::Connection;
use tokio::sync::Mutex;

use sieve_core::config::StorageConfig;
use sieve_core::errors::StorageError;

use super::pragmas::apply_pragmas;
use crate::migrations;
use crate::to_storage_err;

/// A single write connection protected by a mutex.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    /// Open, configure and migrate the write connection.
    pub fn open(path: &Path, config: &StorageConfig) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        Self::prepare(conn, config)
    }

    /// Open an in-memory database.
    pub fn open_in_memory(config: &StorageConfig) -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        Self::prepare(conn, config)
    }

    fn prepare(conn: Connection, config: &StorageConfig) -> Result<Self, StorageError> {
        apply_pragmas(&conn, config)?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Blocking access. Must run off the async executor (inside `spawn_blocking`).
    pub fn with_conn_sync<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let guard = self.conn.blocking_lock();
        f(&guard)
    }
}
