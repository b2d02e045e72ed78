//! Retrying the step that opens a stream.
//!
//! Delays grow geometrically from `initial_backoff`, capped at `max_backoff`,
//! and each one is spread by up to a quarter either way so concurrent callers
//! do not reconnect in lockstep.

use std::future::Future;
use std::time::Duration;

use crate::error::{BridgeError, Result};

/// How often and how patiently to retry.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    /// Growth factor applied to the delay after each failure.
    pub multiplier: f64,
    /// Retry every error, not only those classified as retryable.
    pub retry_all_errors: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            multiplier: 2.0,
            retry_all_errors: false,
        }
    }
}

impl RetryPolicy {
    /// Default backoff, retrying regardless of error kind.
    pub fn retry_all() -> Self {
        Self {
            retry_all_errors: true,
            ..Self::default()
        }
    }

    fn should_retry(&self, error: &BridgeError) -> bool {
        self.retry_all_errors || error.is_retryable()
    }

    /// Un-jittered delay before retry number `retry` (zero-based).
    fn backoff(&self, retry: u32) -> Duration {
        let grown = self.initial_backoff.as_secs_f64() * self.multiplier.powi(retry as i32);
        Duration::from_secs_f64(grown.min(self.max_backoff.as_secs_f64()))
    }

    /// Run `operation` until it succeeds, fails for good, or attempts run out.
    ///
    /// The last error is returned unchanged. A policy with zero attempts never
    /// calls `operation`.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if self.max_attempts == 0 {
            return Err(BridgeError::InvalidArgument(
                "retry policy allows zero attempts".into(),
            ));
        }

        let mut attempt = 1;
        loop {
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if attempt >= self.max_attempts || !self.should_retry(&err) {
                return Err(err);
            }

            let delay = self.backoff(attempt - 1).mul_f64(0.75 + 0.5 * unit_random());
            tracing::warn!(
                attempt,
                max_attempts = self.max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Opening stream failed, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

/// Run `operation` under `policy`.
///
/// Only the request-producing step is retried; once a stream has been handed
/// out, events already consumed are never replayed.
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    policy.execute(operation).await
}

/// Value in [0, 1) drawn from a fresh `RandomState`.
fn unit_random() -> f64 {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let bits = RandomState::new().build_hasher().finish();
    (bits >> 11) as f64 / (1u64 << 53) as f64
}
