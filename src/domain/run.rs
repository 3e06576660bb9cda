//! Runs - asynchronous assistant jobs observed through polling.
//!
//! A run moves through its status lifecycle on the upstream side. This proxy
//! never drives a run; it only classifies what it observes:
//!
//! ```text
//! queued / in_progress / requires_action / cancelling / <unknown>  -> Pending
//! completed                                                        -> Succeeded
//! failed / cancelled / expired                                     -> Failed
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Status label reported by the upstream service for a run.
///
/// Parsing never fails: labels this proxy does not know are kept verbatim in
/// [`RunStatus::Other`] and treated as non-terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Completed,
    Failed,
    Cancelled,
    Expired,
    Other(String),
}

/// Classification of a status from the poller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Not terminal; keep polling.
    Pending,
    /// Terminal success.
    Succeeded,
    /// Terminal failure.
    Failed,
}

impl RunStatus {
    /// Parse an upstream status label.
    pub fn parse(label: &str) -> Self {
        match label {
            "queued" => RunStatus::Queued,
            "in_progress" => RunStatus::InProgress,
            "requires_action" => RunStatus::RequiresAction,
            "cancelling" => RunStatus::Cancelling,
            "completed" => RunStatus::Completed,
            "failed" => RunStatus::Failed,
            "cancelled" => RunStatus::Cancelled,
            "expired" => RunStatus::Expired,
            other => RunStatus::Other(other.to_string()),
        }
    }

    /// The upstream label for this status.
    pub fn as_str(&self) -> &str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Expired => "expired",
            RunStatus::Other(label) => label,
        }
    }

    pub fn phase(&self) -> RunPhase {
        match self {
            RunStatus::Completed => RunPhase::Succeeded,
            RunStatus::Failed | RunStatus::Cancelled | RunStatus::Expired => RunPhase::Failed,
            _ => RunPhase::Pending,
        }
    }

    /// Returns true if no further transition can occur.
    pub fn is_terminal(&self) -> bool {
        self.phase() != RunPhase::Pending
    }

    pub fn is_success(&self) -> bool {
        self.phase() == RunPhase::Succeeded
    }
}

impl From<String> for RunStatus {
    fn from(label: String) -> Self {
        RunStatus::parse(&label)
    }
}

impl From<RunStatus> for String {
    fn from(status: RunStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A run as last observed, with the untouched upstream payload kept for
/// diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub id: String,
    pub status: RunStatus,
    pub payload: serde_json::Value,
}

impl Run {
    /// Build a run from the upstream run object.
    ///
    /// Returns `None` when the payload has no string `status` field.
    pub fn from_payload(payload: serde_json::Value) -> Option<Self> {
        let status = RunStatus::parse(payload.get("status")?.as_str()?);
        let id = payload
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        Some(Self {
            id,
            status,
            payload,
        })
    }
}

/// Delay schedule between run status checks.
///
/// With `backoff_factor == 1.0` every delay equals `interval`; larger factors
/// grow the delay geometrically up to `max_interval`.
#[derive(Debug, Clone, PartialEq)]
pub struct PollSchedule {
    /// Maximum number of status checks.
    pub max_attempts: u32,
    /// Delay after the first check.
    pub interval: Duration,
    /// Growth factor applied per check.
    pub backoff_factor: f64,
    /// Cap on any single delay.
    pub max_interval: Duration,
}

impl PollSchedule {
    /// Fixed-interval schedule.
    pub fn fixed(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
            backoff_factor: 1.0,
            max_interval: interval,
        }
    }

    /// Delay to wait after the given (1-based) check, or `None` if that check
    /// was the last one allowed.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        if self.backoff_factor <= 1.0 {
            return Some(self.interval.min(self.max_interval));
        }
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let scaled = self.interval.as_secs_f64() * self.backoff_factor.powi(exponent);
        let delay = Duration::try_from_secs_f64(scaled).unwrap_or(self.max_interval);
        Some(delay.min(self.max_interval))
    }

    /// Sum of all delays the poller can spend before giving up.
    pub fn total_wait(&self) -> Duration {
        (1..self.max_attempts)
            .filter_map(|attempt| self.delay_after(attempt))
            .sum()
    }
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self::fixed(60, Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn terminal_statuses_are_classified() {
        assert_eq!(RunStatus::parse("completed").phase(), RunPhase::Succeeded);
        assert_eq!(RunStatus::parse("failed").phase(), RunPhase::Failed);
        assert_eq!(RunStatus::parse("cancelled").phase(), RunPhase::Failed);
        assert_eq!(RunStatus::parse("expired").phase(), RunPhase::Failed);
        assert!(RunStatus::Completed.is_success());
        assert!(!RunStatus::Expired.is_success());
    }

    #[test]
    fn known_non_terminal_statuses_keep_waiting() {
        for label in ["queued", "in_progress", "requires_action", "cancelling"] {
            let status = RunStatus::parse(label);
            assert!(!status.is_terminal(), "{label} should not be terminal");
            assert_eq!(status.as_str(), label);
        }
    }

    #[test]
    fn unknown_status_is_preserved() {
        let status = RunStatus::parse("incomplete");
        assert_eq!(status, RunStatus::Other("incomplete".to_string()));
        assert_eq!(status.to_string(), "incomplete");
        assert!(!status.is_terminal());
    }

    #[test]
    fn status_serializes_as_label() {
        let json = serde_json::to_string(&RunStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");

        let status: RunStatus = serde_json::from_str("\"expired\"").unwrap();
        assert_eq!(status, RunStatus::Expired);
    }

    #[test]
    fn run_from_payload_keeps_payload() {
        let payload = json!({"id": "run_1", "status": "queued", "thread_id": "thread_1"});
        let run = Run::from_payload(payload.clone()).unwrap();
        assert_eq!(run.id, "run_1");
        assert_eq!(run.status, RunStatus::Queued);
        assert_eq!(run.payload, payload);
    }

    #[test]
    fn run_from_payload_requires_status() {
        assert!(Run::from_payload(json!({"id": "run_1"})).is_none());
        assert!(Run::from_payload(json!({"id": "run_1", "status": 3})).is_none());
    }

    #[test]
    fn fixed_schedule_stops_after_last_attempt() {
        let schedule = PollSchedule::default();
        assert_eq!(schedule.delay_after(1), Some(Duration::from_secs(1)));
        assert_eq!(schedule.delay_after(59), Some(Duration::from_secs(1)));
        assert_eq!(schedule.delay_after(60), None);
        assert_eq!(schedule.total_wait(), Duration::from_secs(59));
    }

    #[test]
    fn backoff_schedule_grows_and_caps() {
        let schedule = PollSchedule {
            max_attempts: 10,
            interval: Duration::from_millis(500),
            backoff_factor: 2.0,
            max_interval: Duration::from_secs(3),
        };
        assert_eq!(schedule.delay_after(1), Some(Duration::from_millis(500)));
        assert_eq!(schedule.delay_after(2), Some(Duration::from_secs(1)));
        assert_eq!(schedule.delay_after(3), Some(Duration::from_secs(2)));
        assert_eq!(schedule.delay_after(4), Some(Duration::from_secs(3)));
        assert_eq!(schedule.delay_after(9), Some(Duration::from_secs(3)));
        assert_eq!(schedule.delay_after(10), None);
    }

    proptest! {
        #[test]
        fn unrecognized_labels_never_terminate(label in "[a-z_]{1,20}") {
            let terminal = ["completed", "failed", "cancelled", "expired"];
            prop_assume!(!terminal.contains(&label.as_str()));
            let status = RunStatus::parse(&label);
            prop_assert_eq!(status.phase(), RunPhase::Pending);
            prop_assert_eq!(status.as_str(), label.as_str());
        }

        #[test]
        fn delays_never_exceed_cap(
            attempt in 1u32..200,
            interval_ms in 1u64..5_000,
            factor in 1.0f64..4.0,
            extra_ms in 0u64..60_000,
        ) {
            let schedule = PollSchedule {
                max_attempts: 200,
                interval: Duration::from_millis(interval_ms),
                backoff_factor: factor,
                max_interval: Duration::from_millis(interval_ms + extra_ms),
            };
            if let Some(delay) = schedule.delay_after(attempt) {
                prop_assert!(delay <= schedule.max_interval);
            }
        }
    }
}
