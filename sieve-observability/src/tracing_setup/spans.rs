//! Span definitions per operation: retrieval, channel, classification, ingest.

/// Create a retrieval span.
#[macro_export]
macro_rules! retrieval_span {
    ($query:expr, $intent:expr) => {
        tracing::info_span!("sieve.retrieval", query = %$query, intent = %$intent)
    };
}

/// Create a span for one channel's execution.
#[macro_export]
macro_rules! channel_span {
    ($channel:expr, $weight:expr) => {
        tracing::debug_span!("sieve.channel", channel = %$channel, weight = $weight)
    };
}

/// Create an intent classification span.
#[macro_export]
macro_rules! classification_span {
    ($query_len:expr) => {
        tracing::debug_span!("sieve.classification", query_len = $query_len)
    };
}

/// Create a chunk ingestion span.
#[macro_export]
macro_rules! ingest_span {
    ($chunk_id:expr) => {
        tracing::info_span!("sieve.ingest", chunk_id = %$chunk_id)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const RETRIEVAL: &str = "sieve.retrieval";
    pub const CHANNEL: &str = "sieve.channel";
    pub const CLASSIFICATION: &str = "sieve.classification";
    pub const INGEST: &str = "sieve.ingest";
}
