/// Intent classification errors. None of these ever fail a query:
/// the classifier falls back to heuristics and finally to uniform weights.
#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    #[error("intent model timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("intent model failed: {reason}")]
    ModelFailed { reason: String },

    #[error("intent model returned unparsable output: {raw:?}")]
    Unparsable { raw: String },

    #[error("unknown intent label: {label}")]
    UnknownLabel { label: String },
}
