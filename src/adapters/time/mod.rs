//! Sleeper adapters.
//!
//! - `TokioSleeper` - Real timer, used by the server
//! - `InstantSleeper` - Records requested delays and returns immediately

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::ports::Sleeper;

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that never waits, for tests.
#[derive(Debug, Clone, Default)]
pub struct InstantSleeper {
    slept: Arc<Mutex<Vec<Duration>>>,
}

impl InstantSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sleeps requested so far.
    pub fn sleep_count(&self) -> usize {
        self.slept.lock().unwrap().len()
    }

    /// All requested delays, in order.
    pub fn delays(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }

    /// Sum of all requested delays.
    pub fn total_slept(&self) -> Duration {
        self.slept.lock().unwrap().iter().sum()
    }
}

#[async_trait]
impl Sleeper for InstantSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}
