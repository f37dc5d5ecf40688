use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Records a channel that did not contribute to a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradationEvent {
    /// Component that degraded, e.g. `channel.dense`.
    pub component: String,
    pub failure: String,
    /// What the engine did instead.
    pub fallback_used: String,
    pub timestamp: DateTime<Utc>,
}
