//! Bounded retry with backoff
//!
//! Delay before retry `n` (0-based) is `base * multiplier^n`, capped at
//! `max_delay`. Backoff sleeps are not interruptible.

use std::time::Duration;
use tracing::warn;

use super::types::{ClassifyError, Result};

/// Bounded retry policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub base_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::classification()
    }
}

impl RetryPolicy {
    /// Image classification: 5 retries, 15s doubling, capped at 75s
    pub fn classification() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_secs(15),
            multiplier: 2.0,
            max_delay: Duration::from_secs(75),
        }
    }

    /// Hook generation: 4 retries, 10s doubling, capped at 60s
    pub fn hooks() -> Self {
        Self {
            max_retries: 4,
            base_delay: Duration::from_secs(10),
            multiplier: 2.0,
            max_delay: Duration::from_secs(60),
        }
    }

    /// Single attempt
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
            multiplier: 1.0,
            max_delay: Duration::ZERO,
        }
    }

    /// Same retry count with no waiting
    #[must_use]
    pub fn without_delay(self) -> Self {
        Self {
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            ..self
        }
    }

    /// Delay before retry number `retry` (0-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.multiplier.max(1.0).powi(retry as i32);
        let secs = self.base_delay.as_secs_f64() * factor;
        Duration::from_secs_f64(secs.min(self.max_delay.as_secs_f64()))
    }

    /// Run `op` until it succeeds, a failure is not `retryable`, or retries run out
    pub fn run<T, F, P>(&self, what: &str, mut op: F, retryable: P) -> Result<T>
    where
        F: FnMut() -> Result<T>,
        P: Fn(&ClassifyError) -> bool,
    {
        let mut retry = 0;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if retry < self.max_retries && retryable(&e) => {
                    let delay = self.delay_for(retry);
                    warn!(
                        operation = what,
                        attempt = retry + 1,
                        delay_secs = delay.as_secs_f64(),
                        error = %e,
                        "Retrying after failure"
                    );
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                    retry += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
