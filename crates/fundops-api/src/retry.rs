//! Retry utilities with exponential backoff.
//!
//! Transient read failures (dropped connections, gateway hiccups) retry
//! with exponential backoff. Writes and credential checks never retry;
//! the caller decides whether to resubmit those.
//!
//! # Example
//!
//! ```rust,no_run
//! use fundops_api::retry::{with_retry_if, RetryConfig};
//!
//! #[derive(Debug)]
//! enum FetchError {
//!     Transient,
//!     Permanent,
//! }
//!
//! async fn example() -> Result<String, FetchError> {
//!     let config = RetryConfig::default();
//!
//!     with_retry_if(
//!         &config,
//!         || async { Ok("payload".to_string()) },
//!         |err| matches!(err, FetchError::Transient),
//!     )
//!     .await
//! }
//! ```

use std::time::Duration;
use tokio::time::sleep;

/// Configuration for retry behavior.
///
/// Controls how many times to attempt an operation and how long to wait
/// between attempts.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first)
    pub max_attempts: u32,

    /// Initial delay before the first retry
    pub initial_delay: Duration,

    /// Maximum delay between retries
    pub max_delay: Duration,

    /// Base for exponential backoff (typically 2.0)
    pub exponential_base: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            exponential_base: 2.0,
        }
    }
}

impl RetryConfig {
    /// Create a configuration for a given attempt budget.
    ///
    /// Zero is clamped to one; an operation always runs at least once.
    ///
    /// # Arguments
    ///
    /// * `attempts` - Total attempts, including the first
    pub fn for_attempts(attempts: u32) -> Self {
        Self {
            max_attempts: attempts.max(1),
            ..Self::default()
        }
    }

    /// Create a configuration that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
            exponential_base: 1.0,
        }
    }
}

/// Execute a function with retries for retryable errors.
///
/// The function is called up to `max_attempts` times. Errors the
/// predicate rejects are returned immediately; retryable errors wait
/// with exponential backoff before the next attempt.
///
/// # Arguments
///
/// * `config` - Retry configuration
/// * `f` - Function to execute (must be `FnMut` and return a `Future`)
/// * `is_retryable` - Predicate deciding whether an error is worth retrying
///
/// # Returns
///
/// The result of the function call, or the error if it is not retryable
/// or all attempts fail
pub async fn with_retry_if<F, Fut, T, E, P>(
    config: &RetryConfig,
    mut f: F,
    mut is_retryable: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Debug,
    P: FnMut(&E) -> bool,
{
    let mut attempt = 0;
    let mut delay = config.initial_delay;

    loop {
        attempt += 1;

        match f().await {
            Ok(result) => {
                if attempt > 1 {
                    tracing::info!(attempts = attempt, "Operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) if !is_retryable(&e) => {
                tracing::debug!(error = ?e, "Error is not retryable, returning immediately");
                return Err(e);
            }
            Err(e) if attempt >= config.max_attempts => {
                tracing::error!(attempts = attempt, error = ?e, "All retry attempts exhausted");
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(
                    attempt = attempt,
                    max_attempts = config.max_attempts,
                    delay_ms = delay.as_millis(),
                    error = ?e,
                    "Attempt failed, retrying"
                );

                sleep(delay).await;

                // Calculate next delay with exponential backoff
                delay = Duration::from_secs_f64(
                    (delay.as_secs_f64() * config.exponential_base)
                        .min(config.max_delay.as_secs_f64()),
                );
            }
        }
    }
}
