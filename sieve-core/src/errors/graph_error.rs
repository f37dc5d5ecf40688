use super::StorageError;

/// Graph store errors.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("graph backend error: {reason}")]
    Backend { reason: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl GraphError {
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Backend { .. } => true,
            Self::Storage(e) => e.is_transient(),
        }
    }
}
