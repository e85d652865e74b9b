//! Bounded exponential backoff around API calls.

use crate::error::ApiError;
use backoff::ExponentialBackoffBuilder;
use backoff::backoff::Backoff;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Attempts in total, the first one included
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryConfig {
    pub fn none() -> Self {
        Self::with_max_retries(1)
    }

    /// Default delays with `attempts` tries; zero still makes one attempt
    pub fn with_max_retries(attempts: u32) -> Self {
        Self {
            max_attempts: attempts.max(1),
            ..Self::default()
        }
    }
}

pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Run `operation` until it succeeds, fails permanently, or the attempt
    /// budget is spent. Only [`ApiError::is_transient`] failures are retried.
    pub async fn execute<F, Fut, T>(&self, operation: F) -> Result<T, ApiError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut delays = ExponentialBackoffBuilder::new()
            .with_initial_interval(self.config.initial_delay)
            .with_max_interval(self.config.max_delay)
            .with_max_elapsed_time(None)
            .build();

        let mut attempt = 0;
        loop {
            attempt += 1;
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if attempt >= self.config.max_attempts || !error.is_transient() {
                return Err(error);
            }
            let Some(delay) = delays.next_backoff() else {
                return Err(error);
            };

            log::debug!(
                "{} failed on attempt {}/{} ({}), retrying in {:?}",
                error.endpoint(),
                attempt,
                self.config.max_attempts,
                error,
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(max_attempts: u32) -> RetryExecutor {
        RetryExecutor::new(RetryConfig {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        })
    }

    fn server_error() -> ApiError {
        ApiError::Http {
            status: 503,
            endpoint: "/collections/".to_string(),
            message: "unavailable".to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_success_is_returned() {
        let result = fast(3).execute(|| async { Ok::<_, ApiError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_auth_failure_is_final() {
        let attempts = AtomicU32::new(0);

        let result: Result<(), ApiError> = fast(3)
            .execute(|| async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(ApiError::Unauthorized {
                    status: 401,
                    endpoint: "/api-keys".to_string(),
                    server_message: "Unauthorized".to_string(),
                })
            })
            .await;

        assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_server_error_recovers_on_second_attempt() {
        let attempts = AtomicU32::new(0);

        let result = fast(3)
            .execute(|| async {
                match attempts.fetch_add(1, Ordering::SeqCst) {
                    0 => Err(server_error()),
                    _ => Ok("sources"),
                }
            })
            .await;

        assert_eq!(result.unwrap(), "sources");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_attempt_budget_is_respected() {
        let attempts = AtomicU32::new(0);

        let result: Result<(), ApiError> = fast(2)
            .execute(|| async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(server_error())
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_config_constructors() {
        assert_eq!(RetryConfig::none().max_attempts, 1);
        assert_eq!(RetryConfig::with_max_retries(0).max_attempts, 1);
        assert_eq!(RetryConfig::with_max_retries(4).max_attempts, 4);
    }
}
