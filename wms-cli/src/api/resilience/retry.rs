//! Retry policy with exponential backoff
//!
//! Bulk import is not idempotent, so only failures where the backend cannot
//! have processed the request are retried: refused connections, 429 and the
//! gateway statuses 502/503/504. Anything else aborts immediately.

use std::future::Future;
use std::time::Duration;

use log::{debug, warn};
use rand::Rng;

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    /// Randomize each delay between 50% and 100% of its nominal value
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Single attempt, no waiting
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
            backoff_multiplier: 1.0,
            jitter: false,
        }
    }
}

/// Failures worth another attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryableError {
    Network(String),
    RateLimited { retry_after: Option<Duration> },
    Server(u16),
}

impl RetryableError {
    /// Classify an HTTP status. `None` means the status is not retryable.
    pub fn from_status(status: u16, retry_after: Option<Duration>) -> Option<Self> {
        match status {
            429 => Some(RetryableError::RateLimited { retry_after }),
            502..=504 => Some(RetryableError::Server(status)),
            _ => None,
        }
    }
}

impl std::fmt::Display for RetryableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetryableError::Network(msg) => write!(f, "network error: {}", msg),
            RetryableError::RateLimited { .. } => write!(f, "rate limited (HTTP 429)"),
            RetryableError::Server(status) => write!(f, "server error (HTTP {})", status),
        }
    }
}

/// Outcome of a single failed attempt
#[derive(Debug)]
pub enum AttemptError {
    Retry(RetryableError),
    Abort(anyhow::Error),
}

impl From<RetryableError> for AttemptError {
    fn from(err: RetryableError) -> Self {
        AttemptError::Retry(err)
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Nominal delay before retry number `retry` (1-based), before jitter
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1) as i32;
        let factor = self.config.backoff_multiplier.powi(exponent);
        let millis = self.config.base_delay.as_millis() as f64 * factor;
        let max_millis = self.config.max_delay.as_millis() as f64;
        Duration::from_millis(millis.min(max_millis) as u64)
    }

    fn delay_for(&self, retry: u32, err: &RetryableError) -> Duration {
        if let RetryableError::RateLimited {
            retry_after: Some(after),
        } = err
        {
            return (*after).min(self.config.max_delay);
        }

        let delay = self.backoff_delay(retry);
        if self.config.jitter && !delay.is_zero() {
            delay.mul_f64(rand::rng().random_range(0.5..=1.0))
        } else {
            delay
        }
    }

    /// Run `operation` until it succeeds, aborts, or attempts run out
    pub async fn execute<T, F, Fut>(&self, mut operation: F) -> anyhow::Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AttemptError>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("Succeeded on attempt {}/{}", attempt, max_attempts);
                    }
                    return Ok(value);
                }
                Err(AttemptError::Abort(err)) => return Err(err),
                Err(AttemptError::Retry(err)) if attempt >= max_attempts => {
                    return Err(anyhow::anyhow!(
                        "giving up after {} attempt(s): {}",
                        attempt,
                        err
                    ));
                }
                Err(AttemptError::Retry(err)) => {
                    let delay = self.delay_for(attempt, &err);
                    warn!(
                        "Attempt {}/{} failed ({}), retrying in {:?}",
                        attempt, max_attempts, err, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            backoff_multiplier: 2.0,
            jitter: false,
        }
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let policy = RetryPolicy::new(RetryConfig {
            jitter: false,
            ..RetryConfig::default()
        });
        assert_eq!(policy.backoff_delay(1), Duration::from_millis(500));
        assert_eq!(policy.backoff_delay(2), Duration::from_millis(1000));
        assert_eq!(policy.backoff_delay(3), Duration::from_millis(2000));
        assert_eq!(policy.backoff_delay(10), Duration::from_secs(10));
    }

    #[test]
    fn test_retry_after_is_respected() {
        let policy = RetryPolicy::new(RetryConfig::default());
        let err = RetryableError::RateLimited {
            retry_after: Some(Duration::from_secs(2)),
        };
        assert_eq!(policy.delay_for(1, &err), Duration::from_secs(2));
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(
            RetryableError::from_status(503, None),
            Some(RetryableError::Server(503))
        );
        assert!(matches!(
            RetryableError::from_status(429, None),
            Some(RetryableError::RateLimited { .. })
        ));
        assert_eq!(
            RetryableError::from_status(504, None),
            Some(RetryableError::Server(504))
        );
        assert_eq!(RetryableError::from_status(500, None), None);
        assert_eq!(RetryableError::from_status(501, None), None);
        assert_eq!(RetryableError::from_status(400, None), None);
        assert_eq!(RetryableError::from_status(401, None), None);
    }

    #[tokio::test]
    async fn test_execute_retries_until_success() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let policy = RetryPolicy::new(fast_config(3));

        let result = policy
            .execute(move || async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(AttemptError::Retry(RetryableError::Network("refused".into())))
                } else {
                    Ok("done")
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_execute_gives_up() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let policy = RetryPolicy::new(fast_config(2));

        let result: anyhow::Result<()> = policy
            .execute(move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(AttemptError::Retry(RetryableError::Server(502)))
            })
            .await;

        let err = result.unwrap_err().to_string();
        assert!(err.contains("2 attempt"), "{err}");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_execute_abort_is_not_retried() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let policy = RetryPolicy::new(fast_config(5));

        let result: anyhow::Result<()> = policy
            .execute(move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(AttemptError::Abort(anyhow::anyhow!("bad request")))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
