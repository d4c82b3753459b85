//! Exponential backoff for throttled requests.
//!
//! Shields callers from transient upstream throttling without masking
//! other failures: only a classified HTTP 429 is retried, anything else
//! propagates immediately.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::error::CatalogError;

/// Retry policy for catalog calls.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Run `op`, retrying throttled failures with exponential backoff.
    ///
    /// Delays are `base_delay * 2^attempt` with the attempt index
    /// starting at 0, so the defaults back off 1s, 2s, 4s. Exhausting
    /// the budget surfaces [`CatalogError::RetriesExhausted`] so callers
    /// can tell a terminal throttle from a single immediate failure.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, CatalogError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CatalogError>>,
    {
        let mut attempt = 0u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(CatalogError::RateLimited) => {
                    if attempt >= self.max_retries {
                        return Err(CatalogError::RetriesExhausted {
                            attempts: attempt + 1,
                            source: Box::new(CatalogError::RateLimited),
                        });
                    }
                    let delay = self.base_delay * 2u32.pow(attempt);
                    warn!(
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Rate limited by upstream, backing off"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    /// 3 retries with a 1s base delay (1s, 2s, 4s).
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}
