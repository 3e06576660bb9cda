//! Sleeper port - the wait between run status checks.
//!
//! Injected into the run poller so tests can drive a full polling budget
//! without real elapsed time.

use async_trait::async_trait;
use std::time::Duration;

/// Suspends the current task for a while.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}
