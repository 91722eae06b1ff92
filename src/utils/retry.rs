//! Retry helper with exponential backoff.
//!
//! Pipeline operations (ingest, query, synthesis) are single-shot and
//! propagate their first failure. Only setup paths retry, currently the
//! remote vector store connection in `create_store`.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

/// Classifies whether an error is worth retrying. Implemented by the
/// domain error enums in `crate::error`.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Backoff schedule for [`with_retry`].
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Delay multiplier applied after each failed attempt.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }
}

/// Run `operation`, retrying retryable failures with exponential backoff
/// and jitter. Returns the last error once attempts are exhausted or as
/// soon as a non-retryable error occurs.
pub async fn with_retry<T, E, F, Fut>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    E: Retryable + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    let mut delay = config.initial_delay;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if attempt >= config.max_attempts || !error.is_retryable() {
                    return Err(error);
                }
                warn!(attempt, error = %error, "retrying after transient failure");

                sleep(delay + jitter(delay / 4)).await;
                attempt += 1;
                delay = Duration::from_secs_f64(
                    (delay.as_secs_f64() * config.multiplier)
                        .min(config.max_delay.as_secs_f64()),
                );
            }
        }
    }
}

// Spreads concurrent reconnects apart; clock-derived is good enough here.
fn jitter(max: Duration) -> Duration {
    let max_ms = max.as_millis() as u64;
    if max_ms == 0 {
        return Duration::ZERO;
    }
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| u64::from(d.subsec_nanos()));
    Duration::from_millis(nanos % max_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::error::{GenerationError, VectorStoreError};

    fn quick() -> RetryConfig {
        RetryConfig::new(3).with_initial_delay(Duration::from_millis(5))
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&quick(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, VectorStoreError>(42)
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_connection_error_retried_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&quick(), || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(VectorStoreError::ConnectionError("refused".to_string()))
            } else {
                Ok("connected")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "connected");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_invalid_chunk_not_retried() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&quick(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(VectorStoreError::InvalidChunk("empty content".to_string()))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_quota_error_exhausts_attempts() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&quick(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(GenerationError::ApiError {
                status: 429,
                message: "quota exceeded".to_string(),
            })
        })
        .await;

        assert!(matches!(
            result.unwrap_err(),
            GenerationError::ApiError { status: 429, .. }
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
