//! Retry combinator with pluggable backoff.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;
use tracing::warn;

/// Delay policy between attempts.
pub trait Backoff: Send + Sync {
    /// Delay after the 1-based `attempt` failed.
    fn delay(&self, attempt: u32) -> Duration;
}

/// `base_delay * multiplier^attempt`, optionally capped.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    /// Delay unit multiplied by the growth factor.
    pub base_delay: Duration,
    /// Growth factor per attempt.
    pub multiplier: f64,
    /// Upper bound for a single delay.
    pub max_delay: Option<Duration>,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(1000),
            multiplier: 2.0,
            max_delay: None,
        }
    }
}

impl Backoff for ExponentialBackoff {
    fn delay(&self, attempt: u32) -> Duration {
        let delay = self.base_delay.as_millis() as f64 * self.multiplier.powi(attempt as i32);
        let delay = match self.max_delay {
            Some(max) => delay.min(max.as_millis() as f64),
            None => delay,
        };
        Duration::from_millis(delay as u64)
    }
}

/// Same delay after every attempt.
#[derive(Debug, Clone, Copy)]
pub struct FixedBackoff(pub Duration);

impl Backoff for FixedBackoff {
    fn delay(&self, _attempt: u32) -> Duration {
        self.0
    }
}

/// Retry immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBackoff;

impl Backoff for NoBackoff {
    fn delay(&self, _attempt: u32) -> Duration {
        Duration::ZERO
    }
}

/// Adds up to ±10% jitter to another policy.
#[derive(Debug, Clone)]
pub struct Jittered<B>(pub B);

impl<B: Backoff> Backoff for Jittered<B> {
    fn delay(&self, attempt: u32) -> Duration {
        let delay = self.0.delay(attempt).as_millis() as f64;
        let max = delay * 0.1;
        let jittered = delay + rand::thread_rng().gen_range(-max..=max);
        Duration::from_millis(jittered.round().max(0.0) as u64)
    }
}

/// Run `operation` up to `attempts` times, sleeping per `backoff` in between.
///
/// The operation receives the 1-based attempt number. Returns the first
/// success or the error of the last attempt. At least one attempt is made.
pub async fn with_retry<F, Fut, T, E, B>(mut operation: F, attempts: u32, backoff: &B) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    B: Backoff + ?Sized,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= attempts => return Err(e),
            Err(e) => {
                let delay = backoff.delay(attempt);
                warn!(
                    "Attempt {}/{} failed: {}, retrying in {:?}",
                    attempt, attempts, e, delay
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
