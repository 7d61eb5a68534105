//! Bounded retry with exponential backoff.
//!
//! ```text
//! attempt 0 ──fail(retryable)──▶ sleep(backoff(0)) ──▶ attempt 1 ──fail──▶ sleep(backoff(1)) ──▶ ...
//!     │                                                    │
//!     └─ ok / non-retryable ─▶ return                      └─ retries exhausted ─▶ last error
//! ```
//!
//! The only suspension points are the operation itself and the sleeps.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ProviderError;

/// Retry budget for a completion call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Wait before the first retry; doubled for every subsequent one.
    pub base_delay_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_secs: 10,
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay_secs: 0,
        }
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_secs(self.base_delay_secs)
    }

    /// Wait before retry number `attempt + 1`: `base * 2^attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay().saturating_mul(factor)
    }

    /// Run a completion call, retrying only on rate limiting.
    pub async fn run<T, F, Fut>(&self, op: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        retry_with_backoff(
            op,
            self.max_retries,
            |attempt| self.backoff(attempt),
            ProviderError::is_rate_limited,
        )
        .await
    }
}

/// Run `op`, retrying up to `max_retries` times while `is_retryable` holds.
///
/// Returns the first success, the first non-retryable error, or the last
/// error once the budget is spent.
pub async fn retry_with_backoff<T, E, F, Fut, B, P>(
    mut op: F,
    max_retries: u32,
    backoff: B,
    is_retryable: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    B: Fn(u32) -> Duration,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_retries && is_retryable(&err) => {
                let wait = backoff(attempt);
                warn!(
                    attempt = attempt + 1,
                    max_retries,
                    wait_secs = wait.as_secs(),
                    error = %err,
                    "Retryable failure, backing off"
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
