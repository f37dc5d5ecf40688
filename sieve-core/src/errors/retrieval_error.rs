/// Errors that escape `retrieve`. Channel failures never appear here;
/// they are reported through `Diagnostics`.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },

    #[error("retrieval cancelled by caller")]
    Cancelled,

    #[error("retrieval task failed: {reason}")]
    Internal { reason: String },
}
