//! ChannelGuard wraps one executor with the per-channel resource policy.
//!
//! - a semaphore bounds outstanding backend requests; a request that cannot
//!   get a permit within the queue timeout fails fast with `Saturated`
//! - each attempt runs under the channel's soft deadline
//! - a transient backend error is retried after a short backoff, only when
//!   the backoff still ends before the deadline
//! - cancellation wins over everything else

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::time::{sleep_until, timeout, timeout_at, Instant};
use tracing::debug;

use sieve_core::config::ChannelConfig;
use sieve_core::errors::ChannelError;
use sieve_core::models::{ChannelKind, ChannelRequest, ChannelResult};
use sieve_core::traits::ChannelExecutor;
use sieve_core::CancellationToken;

#[derive(Clone)]
pub struct ChannelGuard {
    executor: Arc<dyn ChannelExecutor>,
    permits: Arc<Semaphore>,
    queue_timeout: Duration,
    retry_backoff: Duration,
    max_retries: u32,
}

impl ChannelGuard {
    pub fn new(executor: Arc<dyn ChannelExecutor>, config: &ChannelConfig) -> Self {
        Self {
            executor,
            permits: Arc::new(Semaphore::new(config.max_concurrency.max(1))),
            queue_timeout: Duration::from_millis(config.queue_timeout_ms),
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
            max_retries: config.max_retries,
        }
    }

    pub fn kind(&self) -> ChannelKind {
        self.executor.kind()
    }

    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run the channel with `budget` as its soft timeout.
    pub async fn run(
        &self,
        request: &ChannelRequest,
        budget: Duration,
        cancel: &CancellationToken,
    ) -> Result<ChannelResult, ChannelError> {
        let channel = self.kind();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ChannelError::Cancelled { channel }),
            result = self.run_with_retry(request, budget) => result,
        }
    }

    async fn run_with_retry(
        &self,
        request: &ChannelRequest,
        budget: Duration,
    ) -> Result<ChannelResult, ChannelError> {
        let deadline = Instant::now() + budget;
        let timeout_ms = budget.as_millis() as u64;
        let mut attempt = 0;
        loop {
            match self.attempt(request, deadline, timeout_ms).await {
                Err(e) if is_transient_backend(&e) && attempt < self.max_retries => {
                    let resume = Instant::now() + self.retry_backoff;
                    if resume >= deadline {
                        debug!(channel = %self.kind(), "no time left to retry");
                        return Err(e);
                    }
                    attempt += 1;
                    debug!(channel = %self.kind(), attempt, error = %e, "retrying transient failure");
                    sleep_until(resume).await;
                }
                other => return other,
            }
        }
    }

    async fn attempt(
        &self,
        request: &ChannelRequest,
        deadline: Instant,
        timeout_ms: u64,
    ) -> Result<ChannelResult, ChannelError> {
        let channel = self.kind();
        let wait = self
            .queue_timeout
            .min(deadline.saturating_duration_since(Instant::now()));
        let _permit = match timeout(wait, Arc::clone(&self.permits).acquire_owned()).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) | Err(_) => return Err(ChannelError::Saturated { channel }),
        };

        match timeout_at(deadline, self.executor.query(request)).await {
            Ok(result) => result,
            Err(_) => Err(ChannelError::Timeout {
                channel,
                timeout_ms,
            }),
        }
    }
}

/// Only backend failures flagged transient are retried here. `Saturated`
/// is retryable by the caller but fails fast inside the guard.
fn is_transient_backend(err: &ChannelError) -> bool {
    matches!(err, ChannelError::Backend { transient: true, .. })
}
