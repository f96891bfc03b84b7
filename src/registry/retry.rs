//! Retry with exponential backoff
//!
//! The retry loop is independent of the runtime: delays go through a
//! `Sleeper`, and the decision to retry is a predicate supplied by the caller.

use crate::error::RegistryError;
use async_trait::async_trait;
use std::future::Future;
use std::hash::{BuildHasher, Hasher, RandomState};
use std::time::Duration;

/// HTTP statuses worth retrying
const RETRYABLE_STATUSES: &[u16] = &[408, 429, 500, 502, 503, 504];

/// Upper bound of the random jitter, as a fraction of the delay
const MAX_JITTER: f64 = 0.25;

/// Backoff configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub initial_delay: Duration,
    /// Cap applied to the exponential delay
    pub max_delay: Duration,
    /// Multiplier applied per attempt
    pub backoff_factor: f64,
    /// Add up to 25% random jitter to each delay
    pub use_jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl RetryPolicy {
    /// Two attempts with short delays
    pub fn conservative() -> Self {
        Self {
            max_attempts: 2,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(5000),
            backoff_factor: 2.0,
            use_jitter: true,
        }
    }

    /// Three attempts, the default
    pub fn standard() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10000),
            backoff_factor: 2.0,
            use_jitter: true,
        }
    }

    /// Five attempts starting at half a second
    pub fn aggressive() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_millis(15000),
            backoff_factor: 2.0,
            use_jitter: true,
        }
    }

    /// Set the total number of attempts
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the initial delay
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the delay cap
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the backoff multiplier
    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Enable or disable jitter
    pub fn with_jitter(mut self, enabled: bool) -> Self {
        self.use_jitter = enabled;
        self
    }

    /// Capped exponential delay after the given 1-based attempt, without jitter
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let millis = self.initial_delay.as_millis() as f64 * self.backoff_factor.powi(exponent);
        let capped = millis.min(self.max_delay.as_millis() as f64).max(0.0);
        Duration::from_millis(capped as u64)
    }

    /// Delay after the given 1-based attempt, including jitter when enabled
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.base_delay(attempt);
        if self.use_jitter {
            base + base.mul_f64(jitter_fraction())
        } else {
            base
        }
    }
}

/// Random fraction in `[0, 0.25)`
fn jitter_fraction() -> f64 {
    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u64(0);
    let sample = hasher.finish() % 10_000;
    sample as f64 / 10_000.0 * MAX_JITTER
}

/// Trait for waiting between attempts
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Runs `op` until it succeeds, the attempts run out, or `should_retry` declines
///
/// `op` and both callbacks receive the 1-based attempt number. The error of
/// the final attempt is returned unchanged.
pub async fn retry_with_backoff<T, E, Op, Fut, P, R>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    should_retry: P,
    mut on_retry: R,
    mut op: Op,
) -> Result<T, E>
where
    Op: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E, u32) -> bool,
    R: FnMut(&E, u32, Duration),
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= max_attempts || !should_retry(&err, attempt) {
                    return Err(err);
                }
                let delay = policy.delay_for_attempt(attempt);
                on_retry(&err, attempt, delay);
                sleeper.sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Default retry predicate for registry lookups
///
/// Transient statuses and connection failures are retried. Timeouts fail
/// fast, as do 404s, other statuses and malformed responses.
pub fn is_retryable(err: &RegistryError) -> bool {
    match err {
        RegistryError::HttpStatus { status, .. } => RETRYABLE_STATUSES.contains(status),
        RegistryError::Network { .. } => true,
        RegistryError::Timeout { .. }
        | RegistryError::NotFound { .. }
        | RegistryError::InvalidResponse { .. } => false,
    }
}
