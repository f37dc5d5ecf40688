/// Storage-layer errors for the dual-vector and graph stores.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("inconsistent dual-vector write for chunk '{chunk_id}': {reason}")]
    WriteInconsistency { chunk_id: String, reason: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("corrupt vector blob for chunk '{chunk_id}': {details}")]
    CorruptVector { chunk_id: String, details: String },

    #[error("blocking storage task failed: {reason}")]
    TaskFailed { reason: String },
}

impl StorageError {
    /// Busy database or a failed blocking task may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::SqliteError { .. } | Self::TaskFailed { .. })
    }
}
