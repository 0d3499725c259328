//! Batch configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::BatchError;

/// Numeric options of a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of items analyzed concurrently (chunk size).
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Pause between consecutive chunks, in milliseconds.
    #[serde(default = "default_delay_between_batches")]
    pub delay_between_batches_ms: u64,

    /// Attempts per item, including the first one.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
}

fn default_max_concurrent() -> usize {
    5
}

fn default_delay_between_batches() -> u64 {
    1000
}

fn default_retry_attempts() -> u32 {
    3
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            delay_between_batches_ms: default_delay_between_batches(),
            retry_attempts: default_retry_attempts(),
        }
    }
}

impl BatchConfig {
    /// Set the chunk size.
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    /// Set the inter-chunk pause.
    pub fn with_delay_between_batches(mut self, delay: Duration) -> Self {
        self.delay_between_batches_ms = delay.as_millis() as u64;
        self
    }

    /// Set the attempts per item.
    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    /// Inter-chunk pause as a [`Duration`].
    pub fn delay_between_batches(&self) -> Duration {
        Duration::from_millis(self.delay_between_batches_ms)
    }

    /// Reject options that could not process a single item.
    pub fn validate(&self) -> Result<(), BatchError> {
        if self.max_concurrent < 1 {
            return Err(BatchError::InvalidConfig(
                "max_concurrent must be at least 1".to_string(),
            ));
        }
        if self.retry_attempts < 1 {
            return Err(BatchError::InvalidConfig(
                "retry_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
