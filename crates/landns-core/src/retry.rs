//! Bounded fixed-delay retry executor
//!
//! Every fallible phase of the reconcile cycle (address resolution, record
//! fetch, record update) runs through this one executor. The policy is
//! deliberately simple: a fixed delay between attempts, no backoff growth,
//! no jitter, and a hard attempt budget. Exhausting the budget yields a
//! terminal [`Error::RetriesExhausted`]; the executor never exits the
//! process itself.

use std::future::Future;
use std::time::Duration;

use tracing::{error, warn};

use crate::error::{Error, Result};

/// Bounded retry policy with a fixed inter-attempt delay
///
/// For `max_retries = N`, a continuously failing operation is attempted
/// exactly `N + 1` times before giving up. `max_retries = 0` means a single
/// attempt with no retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Create a new policy
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Maximum retry attempts (not counting the initial attempt)
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Fixed delay between attempts
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `op` until it succeeds or the attempt budget is exhausted
    ///
    /// Each failure is logged before the delay sleep. The sleep happens
    /// between attempts only; once the budget is exhausted the error is
    /// returned immediately.
    ///
    /// `operation` names the phase in logs and in the terminal error.
    pub async fn run<T, F, Fut>(&self, operation: &'static str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.max_retries.saturating_add(1);

        for attempt in 1..=attempts {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!(attempt, attempts, "{operation} failed: {e}");
                    if attempt < attempts {
                        tokio::time::sleep(self.delay).await;
                    }
                }
            }
        }

        error!("{operation} failed after {attempts} attempts, giving up");
        Err(Error::RetriesExhausted {
            operation,
            attempts,
        })
    }
}
