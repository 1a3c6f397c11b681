//! Delivery configuration
//!
//! Timing parameters for the long-poll and incremental delivery modes.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid delivery timing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryConfigError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("poll_interval_ms ({poll}) must not exceed max_wait_ms ({wait})")]
    PollExceedsWait { poll: u64, wait: u64 },
}

/// Delivery timing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Long-poll revision check cadence (default: 1000)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Long-poll maximum wait before answering "no changes" (default: 30000)
    #[serde(default = "default_max_wait_ms")]
    pub max_wait_ms: u64,

    /// Pause between incremental stream events (default: 2000)
    #[serde(default = "default_emit_interval_ms")]
    pub emit_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_max_wait_ms() -> u64 {
    30_000
}

fn default_emit_interval_ms() -> u64 {
    2_000
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            max_wait_ms: default_max_wait_ms(),
            emit_interval_ms: default_emit_interval_ms(),
        }
    }
}

impl DeliveryConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }

    pub fn emit_interval(&self) -> Duration {
        Duration::from_millis(self.emit_interval_ms)
    }

    /// Reject configurations that would spin or never poll.
    pub fn validate(&self) -> Result<(), DeliveryConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(DeliveryConfigError::Zero("poll_interval_ms"));
        }
        if self.max_wait_ms == 0 {
            return Err(DeliveryConfigError::Zero("max_wait_ms"));
        }
        if self.emit_interval_ms == 0 {
            return Err(DeliveryConfigError::Zero("emit_interval_ms"));
        }
        if self.poll_interval_ms > self.max_wait_ms {
            return Err(DeliveryConfigError::PollExceedsWait {
                poll: self.poll_interval_ms,
                wait: self.max_wait_ms,
            });
        }
        Ok(())
    }
}
