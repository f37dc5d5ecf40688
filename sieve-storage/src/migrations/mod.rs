//! Schema migrations tracked through `PRAGMA user_version`.

mod v001_chunks;
mod v002_graph;

use rusqlite::Connection;
use tracing::info;

use sieve_core::errors::StorageError;

/// Latest schema version.
pub const LATEST_VERSION: u32 = 2;

/// Apply every migration newer than the database's `user_version`.
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let current_version: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| StorageError::MigrationFailed {
            version: 0,
            reason: e.to_string(),
        })?;

    let migrations: &[(&str, u32)] = &[
        (v001_chunks::MIGRATION_SQL, 1),
        (v002_graph::MIGRATION_SQL, 2),
    ];

    for (sql, version) in migrations {
        if current_version < *version {
            conn.execute_batch(sql)
                .map_err(|e| StorageError::MigrationFailed {
                    version: *version,
                    reason: e.to_string(),
                })?;
            conn.pragma_update(None, "user_version", version)
                .map_err(|e| StorageError::MigrationFailed {
                    version: *version,
                    reason: e.to_string(),
                })?;
            info!(version, "applied migration");
        }
    }
    Ok(())
}
