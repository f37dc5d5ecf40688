//! Error handling for Sieve.
//! One error enum per subsystem, `thiserror` only, aggregated into `SieveError`.

pub mod channel_error;
pub mod classification_error;
pub mod config_error;
pub mod embedding_error;
pub mod graph_error;
pub mod retrieval_error;
pub mod storage_error;

pub use channel_error::ChannelError;
pub use classification_error::ClassificationError;
pub use config_error::ConfigError;
pub use embedding_error::EmbeddingError;
pub use graph_error::GraphError;
pub use retrieval_error::RetrievalError;
pub use storage_error::StorageError;

/// Top-level error for the whole workspace.
#[derive(Debug, thiserror::Error)]
pub enum SieveError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    Classification(#[from] ClassificationError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SieveError {
    /// Whether this error belongs to a class that must reach the caller.
    ///
    /// Only invalid queries and inconsistent dual-vector writes are fatal;
    /// everything else degrades into diagnostics.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Retrieval(RetrievalError::InvalidQuery { .. })
                | Self::Storage(StorageError::WriteInconsistency { .. })
        )
    }
}

pub type SieveResult<T> = Result<T, SieveError>;
