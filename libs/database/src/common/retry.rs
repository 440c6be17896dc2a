use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff policy for connection attempts made at startup.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry in milliseconds
    pub initial_delay_ms: u64,

    /// Upper bound for a single delay in milliseconds
    pub max_delay_ms: u64,

    /// Growth factor applied to the delay after every failed attempt
    pub backoff_multiplier: f64,

    /// Scale each delay by a random factor in [0.5, 1.0)
    pub use_jitter: bool,
}

impl RetryConfig {
    /// Defaults: 3 retries, 100ms initial delay, 5s cap, x2 growth, jitter on.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }

    /// Un-jittered delay before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> u64 {
        let exponent = retry.saturating_sub(1) as i32;
        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
        (delay as u64).min(self.max_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
            use_jitter: true,
        }
    }
}

/// Retry an async operation with exponential backoff.
///
/// The last error is returned once `max_retries` retries have failed.
///
/// ```ignore
/// let config = RetryConfig::new().with_max_retries(5);
/// let client = retry_with_backoff(|| connect_from_config(&mongo), config).await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!(retries = attempt, "Operation succeeded after retrying");
                }
                return Ok(result);
            }
            Err(e) => {
                attempt += 1;

                if attempt > config.max_retries {
                    warn!(attempts = attempt, error = %e, "Giving up after repeated failures");
                    return Err(e);
                }

                let delay = config.delay_for(attempt);
                let delay = if config.use_jitter {
                    apply_jitter(delay)
                } else {
                    delay
                };

                debug!(
                    attempt,
                    max_retries = config.max_retries,
                    delay_ms = delay,
                    error = %e,
                    "Operation failed, retrying"
                );

                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }
    }
}

/// Scale `delay` by a pseudo-random factor between 0.5 and 1.0.
fn apply_jitter(delay: u64) -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let random_factor =
        (RandomState::new().hash_one(std::time::SystemTime::now()) % 50) as f64 / 100.0 + 0.5;

    (delay as f64 * random_factor) as u64
}

/// [`retry_with_backoff`] with [`RetryConfig::default`].
pub async fn retry<F, Fut, T, E>(operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    retry_with_backoff(operation, RetryConfig::default()).await
}
