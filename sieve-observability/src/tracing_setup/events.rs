//! Structured log events for key retrieval operations.

/// A channel did not contribute to a query.
pub fn channel_degraded(channel: &str, status: &str) {
    tracing::warn!(
        event = "channel_degraded",
        channel = %channel,
        status = %status,
        "channel degraded"
    );
}

/// Classification fell back from the model.
pub fn classification_fallback(reason: &str, source: &str) {
    tracing::debug!(
        event = "classification_fallback",
        reason = %reason,
        source = %source,
        "intent classification fell back"
    );
}

/// A retrieval finished (possibly degraded).
pub fn retrieval_completed(result_count: usize, degraded: usize, elapsed_ms: u64) {
    tracing::info!(
        event = "retrieval_completed",
        result_count = result_count,
        degraded_channels = degraded,
        elapsed_ms = elapsed_ms,
        "retrieval completed"
    );
}

/// A degradation was recorded by the tracker.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}

/// A previously degraded component is healthy again.
pub fn degradation_recovered(component: &str) {
    tracing::info!(
        event = "degradation_recovered",
        component = %component,
        "component recovered"
    );
}
