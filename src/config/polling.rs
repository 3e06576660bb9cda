//! Run polling configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::run::PollSchedule;

/// Controls how long a caller waits for a run to reach a terminal status.
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    /// Maximum number of run status checks
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay after the first non-terminal check, in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Multiplier applied to the delay after each check (1.0 = fixed interval)
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,

    /// Upper bound for a single delay, in milliseconds
    #[serde(default = "default_max_interval_ms")]
    pub max_interval_ms: u64,
}

impl PollingConfig {
    /// Build the delay schedule the poller follows.
    pub fn schedule(&self) -> PollSchedule {
        PollSchedule {
            max_attempts: self.max_attempts,
            interval: Duration::from_millis(self.interval_ms),
            backoff_factor: self.backoff_factor,
            max_interval: Duration::from_millis(self.max_interval_ms),
        }
    }

    /// Validate polling configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_attempts == 0 {
            return Err(ValidationError::InvalidPollAttempts);
        }
        if self.interval_ms == 0 {
            return Err(ValidationError::InvalidPollInterval);
        }
        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            return Err(ValidationError::InvalidBackoffFactor);
        }
        if self.max_interval_ms < self.interval_ms {
            return Err(ValidationError::InvalidMaxInterval);
        }
        Ok(())
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_ms: default_interval_ms(),
            backoff_factor: default_backoff_factor(),
            max_interval_ms: default_max_interval_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    60
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_backoff_factor() -> f64 {
    1.0
}

fn default_max_interval_ms() -> u64 {
    10_000
}
