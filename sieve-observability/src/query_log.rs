//! Query performance logging: query text, intent, latency, result count,
//! degraded channels.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use sieve_core::intent::Intent;
use sieve_core::models::ChannelKind;

/// A single query log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryLogEntry {
    pub query: String,
    pub intent: Intent,
    pub latency: Duration,
    pub result_count: usize,
    pub degraded_channels: Vec<ChannelKind>,
    pub timestamp_epoch_ms: i64,
}

impl QueryLogEntry {
    /// Create a new entry with the timestamp set to now.
    pub fn new(
        query: impl Into<String>,
        intent: Intent,
        latency: Duration,
        result_count: usize,
        degraded_channels: Vec<ChannelKind>,
    ) -> Self {
        Self {
            query: query.into(),
            intent,
            latency,
            result_count,
            degraded_channels,
            timestamp_epoch_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Bounded query log (ring buffer behavior).
#[derive(Debug, Clone)]
pub struct QueryLog {
    entries: Vec<QueryLogEntry>,
    max_entries: usize,
}

impl Default for QueryLog {
    fn default() -> Self {
        Self::with_capacity(sieve_core::config::defaults::DEFAULT_QUERY_LOG_CAPACITY)
    }
}

impl QueryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Record a query.
    pub fn record(&mut self, entry: QueryLogEntry) {
        tracing::debug!(
            event = "query_logged",
            query = %entry.query,
            intent = %entry.intent,
            latency_ms = entry.latency.as_millis() as u64,
            result_count = entry.result_count,
            degraded = entry.degraded_channels.len(),
            "query logged"
        );

        self.entries.push(entry);
        if self.entries.len() > self.max_entries {
            self.entries.drain(..self.entries.len() - self.max_entries);
        }
    }

    pub fn entries(&self) -> &[QueryLogEntry] {
        &self.entries
    }

    /// Average latency across all logged queries.
    pub fn avg_latency(&self) -> Duration {
        if self.entries.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.entries.iter().map(|e| e.latency).sum();
        total / self.entries.len() as u32
    }

    /// Latency at the given percentile (0.0 to 1.0).
    pub fn latency_percentile(&self, p: f64) -> Duration {
        if self.entries.is_empty() {
            return Duration::ZERO;
        }
        let mut latencies: Vec<Duration> = self.entries.iter().map(|e| e.latency).collect();
        latencies.sort();
        let p = p.clamp(0.0, 1.0);
        let idx = ((p * (latencies.len() - 1) as f64).round() as usize).min(latencies.len() - 1);
        latencies[idx]
    }

    /// Fraction of logged queries with at least one degraded channel.
    pub fn degraded_rate(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let degraded = self
            .entries
            .iter()
            .filter(|e| !e.degraded_channels.is_empty())
            .count();
        degraded as f64 / self.entries.len() as f64
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }
}
