//! Bounded retry for API calls that fail transiently
//!
//! Some APIs reject a request until an eventually-consistent dependency
//! (an IAM role, a deprecation window) has propagated. Handlers wrap those
//! calls in [`retry_when`] with a predicate naming the retryable errors.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// How long and how often to retry
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total time budget; no new attempt starts after it elapses
    pub timeout: Duration,

    /// Delay before the first retry
    pub initial_delay: Duration,

    /// Upper bound for the delay between attempts
    pub max_delay: Duration,

    /// Multiplier applied to the delay after each retry
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    /// Create a new retry configuration with defaults
    ///
    /// Defaults:
    /// - timeout: 2 minutes
    /// - initial_delay: 100ms
    /// - max_delay: 5s
    /// - backoff_multiplier: 2.0
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    fn next_delay(&self, delay: Duration) -> Duration {
        let nanos = (delay.as_nanos() as f64 * self.backoff_multiplier) as u64;
        Duration::from_nanos(nanos).min(self.max_delay)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

/// Run `operation` until it succeeds, fails with an error `is_retryable`
/// rejects, or the timeout elapses
///
/// On timeout the error of the last attempt is returned. The operation always
/// runs at least once.
///
/// # Example
/// ```ignore
/// let output = retry_when(
///     RetryConfig::new().with_timeout(PROPAGATION_TIMEOUT),
///     || client.set_logging_options(&input),
///     |err| matches!(err, ApiError::InvalidRequest(_)),
/// )
/// .await?;
/// ```
pub async fn retry_when<F, Fut, T, E, P>(
    config: RetryConfig,
    mut operation: F,
    is_retryable: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let deadline = Instant::now() + config.timeout;
    let mut delay = config.initial_delay;
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        let err = match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!("Operation succeeded after {} attempts", attempt);
                }
                return Ok(result);
            }
            Err(e) => e,
        };

        if !is_retryable(&err) {
            return Err(err);
        }

        let now = Instant::now();
        if now >= deadline {
            warn!("Giving up after {} attempts: {}", attempt, err);
            return Err(err);
        }

        // Never sleep past the deadline
        let sleep_for = delay.min(deadline - now);
        debug!(
            "Retryable error (attempt {}): {}. Retrying in {:?}",
            attempt, err, sleep_for
        );
        tokio::time::sleep(sleep_for).await;

        delay = config.next_delay(delay);
    }
}

/// Retry with the default configuration while `is_retryable` holds
pub async fn retry<F, Fut, T, E, P>(operation: F, is_retryable: P) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    retry_when(RetryConfig::default(), operation, is_retryable).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Debug, PartialEq)]
    enum ApiError {
        InvalidRequest,
        NotFound,
    }

    impl std::fmt::Display for ApiError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self)
        }
    }

    fn fast() -> RetryConfig {
        RetryConfig::new()
            .with_timeout(Duration::from_secs(5))
            .with_initial_delay(Duration::from_millis(5))
    }

    #[tokio::test]
    async fn test_retry_success_first_attempt() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry(
            || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ApiError>("done")
                }
            },
            |_| true,
        )
        .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_retryable_errors() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_when(
            fast(),
            || {
                let counter = counter_clone.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(ApiError::InvalidRequest)
                    } else {
                        Ok("done")
                    }
                }
            },
            |e| *e == ApiError::InvalidRequest,
        )
        .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_returns_immediately() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: Result<(), ApiError> = retry_when(
            fast(),
            || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(ApiError::NotFound)
                }
            },
            |e| *e == ApiError::InvalidRequest,
        )
        .await;

        assert_eq!(result, Err(ApiError::NotFound));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_timeout_returns_last_error() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let config = RetryConfig::new()
            .with_timeout(Duration::from_millis(50))
            .with_initial_delay(Duration::from_millis(10))
            .with_max_delay(Duration::from_millis(10));

        let result: Result<(), ApiError> = retry_when(
            config,
            || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(ApiError::InvalidRequest)
                }
            },
            |_| true,
        )
        .await;

        assert_eq!(result, Err(ApiError::InvalidRequest));
        assert!(counter.load(Ordering::SeqCst) >= 2);
    }

    #[test]
    fn test_backoff_is_capped() {
        let config = RetryConfig::new()
            .with_initial_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(300));

        let second = config.next_delay(config.initial_delay);
        assert_eq!(second, Duration::from_millis(200));
        assert_eq!(config.next_delay(second), Duration::from_millis(300));
    }

    #[test]
    fn test_zero_timeout_still_runs_once() {
        let counter = AtomicU32::new(0);
        let result: Result<(), ApiError> = tokio_test::block_on(retry_when(
            RetryConfig::new().with_timeout(Duration::ZERO),
            || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(ApiError::InvalidRequest) }
            },
            |_| true,
        ));

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
