//! Retry with exponential backoff for provider calls

use crate::config::FileRetryConfig;
use chorus_application::BackendError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Exponential backoff policy owned by each adapter
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// A policy that tries exactly once
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// Delay before retry number `attempt` (0-indexed), capped at `max_backoff`
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.max(1.0).powi(attempt as i32);
        let millis = self.initial_backoff.as_millis() as f64 * factor;
        let cap = self.max_backoff.as_millis() as f64;
        Duration::from_millis(millis.min(cap) as u64)
    }

    /// Run `f` until it succeeds, fails with a non-transient error, or the
    /// attempts run out.
    ///
    /// Exhausting attempts on transient errors yields
    /// [`BackendError::RetriesExhausted`] carrying the last error.
    pub async fn execute<F, Fut, T>(&self, backend: &str, f: F) -> Result<T, BackendError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, BackendError>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() => {
                    attempt += 1;
                    if attempt >= attempts {
                        if attempts == 1 {
                            return Err(e);
                        }
                        return Err(BackendError::RetriesExhausted {
                            attempts,
                            last: e.to_string(),
                        });
                    }
                    let delay = self.delay_for_attempt(attempt - 1);
                    warn!(
                        backend,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Transient error, retrying: {}",
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl From<&FileRetryConfig> for RetryPolicy {
    fn from(config: &FileRetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
            multiplier: config.multiplier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(2),
            multiplier: 2.0,
        }
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(4));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(8));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_secs(10));
        assert_eq!(policy.delay_for_attempt(30), Duration::from_secs(10));
    }

    #[test]
    fn test_from_file_config() {
        let policy = RetryPolicy::from(&FileRetryConfig::default());
        assert_eq!(policy, RetryPolicy::default());
    }

    #[tokio::test]
    async fn test_success_after_transient_failure() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result = fast(3)
            .execute("test", || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(BackendError::Transport("HTTP 503".into()))
                    } else {
                        Ok("recovered")
                    }
                }
            })
            .await;

        assert_eq!(result, Ok("recovered"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_non_retryable_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result: Result<(), _> = fast(3)
            .execute("test", || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(BackendError::Unavailable("bad key".into()))
                }
            })
            .await;

        assert_eq!(result, Err(BackendError::Unavailable("bad key".into())));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhausted() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result: Result<(), _> = fast(3)
            .execute("test", || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(BackendError::Timeout)
                }
            })
            .await;

        assert_eq!(
            result,
            Err(BackendError::RetriesExhausted {
                attempts: 3,
                last: "Request timed out".into()
            })
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_single_attempt_returns_error_as_is() {
        let result: Result<(), _> = RetryPolicy::none()
            .execute("test", || async { Err(BackendError::Timeout) })
            .await;
        assert_eq!(result, Err(BackendError::Timeout));
    }
}
