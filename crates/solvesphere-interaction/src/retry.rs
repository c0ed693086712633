//! Exponential-backoff retry for quota-class failures.
//!
//! Retries happen below the classification boundary: callers of the
//! reasoning client only ever observe the final classified failure, never
//! the individual attempts.

use solvesphere_core::solve::SolveFailure;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Delay before the first retry; doubles for each further retry.
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryConfig {
    /// Delay before retry `n` (1-based): `base * 2^(n-1)`.
    pub fn delay_before_retry(&self, retry: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(retry.saturating_sub(1))
    }
}

/// One failed attempt, carrying the classified failure and an optional
/// server-suggested delay from the Retry-After header.
#[derive(Debug)]
pub(crate) struct AttemptError {
    pub failure: SolveFailure,
    pub retry_after: Option<Duration>,
}

impl AttemptError {
    /// A failure with no server-suggested delay.
    pub fn terminal(failure: SolveFailure) -> Self {
        Self {
            failure,
            retry_after: None,
        }
    }
}

/// Runs `operation` under the retry policy.
///
/// Only failures whose classification is retryable (rate-limit and
/// overload class) are re-attempted; everything else propagates
/// immediately. The cancellation token is observed before every attempt
/// and during the backoff sleep; a cancelled operation is never retried.
pub(crate) async fn run_with_retry<T, F, Fut>(
    config: &RetryConfig,
    cancel: &CancellationToken,
    mut operation: F,
) -> Result<T, SolveFailure>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AttemptError>>,
{
    let mut completed = 0u32;
    loop {
        if cancel.is_cancelled() {
            return Err(SolveFailure::Cancelled);
        }

        let error = match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };
        completed += 1;

        if error.failure.is_cancelled() {
            return Err(SolveFailure::Cancelled);
        }
        if !error.failure.is_retryable() || completed >= config.max_attempts {
            return Err(error.failure);
        }

        let delay = error
            .retry_after
            .unwrap_or_else(|| config.delay_before_retry(completed));
        tracing::debug!(
            attempt = completed,
            delay_ms = delay.as_millis() as u64,
            "retrying after {}",
            error.failure
        );

        tokio::select! {
            _ = cancel.cancelled() => return Err(SolveFailure::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
    }
}
