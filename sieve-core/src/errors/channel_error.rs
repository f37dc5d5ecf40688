use crate::models::{ChannelKind, ChannelStatus};

/// Per-channel failures. Always non-fatal: the channel contributes an
/// empty result and the failure is recorded in diagnostics.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChannelError {
    #[error("{channel} channel timed out after {timeout_ms}ms")]
    Timeout { channel: ChannelKind, timeout_ms: u64 },

    #[error("{channel} channel backend error: {reason}")]
    Backend {
        channel: ChannelKind,
        reason: String,
        transient: bool,
    },

    #[error("{channel} channel saturated: too many outstanding requests")]
    Saturated { channel: ChannelKind },

    #[error("{channel} channel cancelled")]
    Cancelled { channel: ChannelKind },

    #[error("{channel} channel needs an embedding but none was produced")]
    MissingEmbedding { channel: ChannelKind },
}

impl ChannelError {
    /// Transient failure of the backend.
    pub fn transient(channel: ChannelKind, reason: impl Into<String>) -> Self {
        Self::Backend {
            channel,
            reason: reason.into(),
            transient: true,
        }
    }

    /// Permanent failure of the backend (not retried).
    pub fn permanent(channel: ChannelKind, reason: impl Into<String>) -> Self {
        Self::Backend {
            channel,
            reason: reason.into(),
            transient: false,
        }
    }

    /// The channel this error belongs to.
    pub fn channel(&self) -> ChannelKind {
        match self {
            Self::Timeout { channel, .. }
            | Self::Backend { channel, .. }
            | Self::Saturated { channel }
            | Self::Cancelled { channel }
            | Self::MissingEmbedding { channel } => *channel,
        }
    }

    /// Whether a retry may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Backend { transient, .. } => *transient,
            Self::Saturated { .. } => true,
            Self::Timeout { .. } | Self::Cancelled { .. } | Self::MissingEmbedding { .. } => false,
        }
    }

    /// Diagnostic status recorded for this failure.
    pub fn status(&self) -> ChannelStatus {
        match self {
            Self::Timeout { timeout_ms, .. } => ChannelStatus::TimedOut {
                timeout_ms: *timeout_ms,
            },
            Self::Saturated { .. } => ChannelStatus::Saturated,
            Self::Cancelled { .. } => ChannelStatus::Cancelled,
            Self::Backend { .. } | Self::MissingEmbedding { .. } => ChannelStatus::Failed {
                reason: self.to_string(),
            },
        }
    }
}
