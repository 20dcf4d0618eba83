//! Readiness Policy
//!
//! Bounded wait for the store to become ready. Each attempt is capped by the
//! readiness timeout; failed attempts are retried with exponential backoff
//! and jitter until the attempt budget is spent.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::application::ports::StoreError;
use crate::infrastructure::config::ConnectionSettings;

/// Readiness retry configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadinessConfig {
    /// Upper bound on one attempt.
    pub ready_timeout: Duration,
    /// Total attempts, at least one.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Largest delay between attempts.
    pub max_delay: Duration,
    /// Multiplier for exponential backoff.
    pub multiplier: f64,
    /// Jitter factor as a fraction (0.1 = ±10%).
    pub jitter_factor: f64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self::from_connection_settings(&ConnectionSettings::default())
    }
}

impl ReadinessConfig {
    /// Build from connection settings.
    #[must_use]
    pub const fn from_connection_settings(settings: &ConnectionSettings) -> Self {
        Self {
            ready_timeout: settings.ready_timeout,
            max_attempts: settings.connect_attempts,
            initial_delay: settings.backoff_initial,
            max_delay: settings.backoff_max,
            multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

/// Exponential backoff with jitter between readiness attempts.
#[derive(Debug)]
pub struct BackoffPolicy {
    config: ReadinessConfig,
    current_delay: Duration,
    attempt_count: u32,
}

impl BackoffPolicy {
    /// Create a new policy.
    #[must_use]
    pub const fn new(config: ReadinessConfig) -> Self {
        let initial_delay = config.initial_delay;
        Self {
            config,
            current_delay: initial_delay,
            attempt_count: 0,
        }
    }

    /// Delay before the next retry, or `None` once the attempt budget is spent.
    #[must_use]
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempt_count + 1 >= self.config.max_attempts {
            return None;
        }
        self.attempt_count += 1;

        let delay = self.apply_jitter(self.current_delay);

        #[allow(clippy::cast_precision_loss)]
        let scaled = (self.current_delay.as_millis() as f64 * self.config.multiplier).round();
        let next_millis = if scaled.is_finite() && scaled > 0.0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                scaled as u128
            }
        } else {
            0
        };
        let capped = next_millis.min(self.config.max_delay.as_millis());
        self.current_delay = Duration::from_millis(u64::try_from(capped).unwrap_or(u64::MAX));

        Some(delay)
    }

    /// Retries handed out so far.
    #[must_use]
    pub const fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    fn apply_jitter(&self, duration: Duration) -> Duration {
        if self.config.jitter_factor <= 0.0 || duration.is_zero() {
            return duration;
        }

        #[allow(clippy::cast_precision_loss)]
        let base_millis = duration.as_millis() as f64;
        let jitter_range = base_millis * self.config.jitter_factor;
        let jitter: f64 = rand::rng().random_range(-jitter_range..=jitter_range);
        let adjusted_millis = (base_millis + jitter).max(1.0);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let adjusted_u64 = adjusted_millis as u64;
        Duration::from_millis(adjusted_u64)
    }
}

/// Run `connect` until it succeeds or the readiness budget is spent.
///
/// Exhaustion yields [`StoreError::NotReady`] carrying the last failure.
pub async fn connect_with_retry<T, F, Fut>(
    config: ReadinessConfig,
    mut connect: F,
) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let ready_timeout = config.ready_timeout;
    let mut policy = BackoffPolicy::new(config);
    let mut attempts = 0;

    loop {
        attempts += 1;
        let last_error = match tokio::time::timeout(ready_timeout, connect()).await {
            Ok(Ok(value)) => {
                if attempts > 1 {
                    tracing::info!(attempts, "Store ready after retry");
                }
                return Ok(value);
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("timed out after {ready_timeout:?}"),
        };

        let Some(delay) = policy.next_delay() else {
            tracing::error!(attempts, error = %last_error, "Store did not become ready");
            return Err(StoreError::NotReady {
                attempts,
                timeout: ready_timeout,
                last_error,
            });
        };

        tracing::warn!(
            attempts,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %last_error,
            "Store not ready, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}
