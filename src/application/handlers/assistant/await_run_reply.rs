//! AwaitRunReplyHandler - Resolve an asynchronous run to the assistant's reply
//!
//! Polls the run until it reaches a terminal status or the attempt budget is
//! spent, then reads the newest assistant message from the thread.
//!
//! ```text
//!            pending
//!           ┌───────┐
//!           ▼       │
//!        Waiting ───┘──► Succeeded ──► list messages ──► reply | NoAssistantMessage
//!           │
//!           ├──────────► Failed    (failed / cancelled / expired, carries run payload)
//!           ├──────────► TimedOut  (max_attempts checks, none terminal)
//!           └──────────► Errored   (status check itself failed)
//! ```
//!
//! Only `Succeeded` fetches messages.

use std::sync::Arc;

use crate::domain::{
    latest_assistant_message, PollSchedule, Run, RunPhase, RunStatus, ThreadMessage,
};
use crate::ports::{AssistantApi, Sleeper, UpstreamError};

/// Command to wait for a run's reply
#[derive(Debug, Clone)]
pub struct AwaitRunReplyCommand {
    pub thread_id: String,
    pub run_id: String,
}

/// Result of a run that completed with an assistant reply
#[derive(Debug, Clone)]
pub struct AwaitRunReplyResult {
    /// Newest assistant-authored message in the thread
    pub reply: ThreadMessage,
    /// Number of status checks performed
    pub attempts: u32,
}

/// Error type for awaiting run replies
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AwaitRunReplyError {
    /// Run reached a failure terminal status
    #[error("run ended with status {status}")]
    RunFailed {
        status: RunStatus,
        /// Full upstream run object
        run: serde_json::Value,
    },

    /// Run was still pending after every allowed check
    #[error("run did not finish after {attempts} status checks")]
    TimedOut { attempts: u32 },

    /// Run completed but the thread holds no assistant message
    #[error("no assistant message found")]
    NoAssistantMessage,

    /// A status check or the message listing failed
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Handler that turns a run into its assistant reply
pub struct AwaitRunReplyHandler {
    api: Arc<dyn AssistantApi>,
    sleeper: Arc<dyn Sleeper>,
    schedule: PollSchedule,
}

impl AwaitRunReplyHandler {
    pub fn new(
        api: Arc<dyn AssistantApi>,
        sleeper: Arc<dyn Sleeper>,
        schedule: PollSchedule,
    ) -> Self {
        Self {
            api,
            sleeper,
            schedule,
        }
    }

    pub async fn handle(
        &self,
        cmd: AwaitRunReplyCommand,
    ) -> Result<AwaitRunReplyResult, AwaitRunReplyError> {
        let (run, attempts) = self.wait_for_completion(&cmd).await?;

        let messages = self.api.list_messages(&cmd.thread_id).await?;
        let reply = latest_assistant_message(&messages)
            .cloned()
            .ok_or_else(|| {
                tracing::warn!(
                    thread_id = %cmd.thread_id,
                    run_id = %run.id,
                    "Run completed without an assistant message"
                );
                AwaitRunReplyError::NoAssistantMessage
            })?;

        Ok(AwaitRunReplyResult { reply, attempts })
    }

    /// Poll until the run succeeds, returning it with the number of checks made.
    async fn wait_for_completion(
        &self,
        cmd: &AwaitRunReplyCommand,
    ) -> Result<(Run, u32), AwaitRunReplyError> {
        for attempt in 1..=self.schedule.max_attempts {
            let run = self.api.get_run(&cmd.thread_id, &cmd.run_id).await?;

            match run.status.phase() {
                RunPhase::Succeeded => {
                    tracing::info!(
                        thread_id = %cmd.thread_id,
                        run_id = %cmd.run_id,
                        attempt,
                        "Run completed"
                    );
                    return Ok((run, attempt));
                }
                RunPhase::Failed => {
                    tracing::warn!(
                        thread_id = %cmd.thread_id,
                        run_id = %cmd.run_id,
                        status = %run.status,
                        attempt,
                        "Run ended unsuccessfully"
                    );
                    return Err(AwaitRunReplyError::RunFailed {
                        status: run.status,
                        run: run.payload,
                    });
                }
                RunPhase::Pending => {
                    tracing::debug!(
                        run_id = %cmd.run_id,
                        status = %run.status,
                        attempt,
                        "Run still pending"
                    );
                }
            }

            if let Some(delay) = self.schedule.delay_after(attempt) {
                self.sleeper.sleep(delay).await;
            }
        }

        tracing::warn!(
            thread_id = %cmd.thread_id,
            run_id = %cmd.run_id,
            attempts = self.schedule.max_attempts,
            "Gave up waiting for run"
        );
        Err(AwaitRunReplyError::TimedOut {
            attempts: self.schedule.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAssistantApi, MockOperation};
    use crate::adapters::time::InstantSleeper;
    use crate::domain::MessageRole;
    use std::time::Duration;

    fn command() -> AwaitRunReplyCommand {
        AwaitRunReplyCommand {
            thread_id: "thread_1".to_string(),
            run_id: "run_1".to_string(),
        }
    }

    fn handler(api: &Arc<MockAssistantApi>, sleeper: &Arc<InstantSleeper>) -> AwaitRunReplyHandler {
        AwaitRunReplyHandler::new(api.clone(), sleeper.clone(), PollSchedule::default())
    }

    #[tokio::test]
    async fn completes_after_pending_checks() {
        let api = Arc::new(
            MockAssistantApi::new()
                .with_run_statuses(["queued", "queued", "completed"])
                .with_message(MessageRole::User, "Invoice 42 was charged twice")
                .with_message(MessageRole::Assistant, "old answer")
                .with_message(MessageRole::User, "And again?")
                .with_message(MessageRole::Assistant, "billing"),
        );
        let sleeper = Arc::new(InstantSleeper::new());

        let result = handler(&api, &sleeper).handle(command()).await.unwrap();

        assert_eq!(result.reply.text, "billing");
        assert_eq!(result.attempts, 3);
        assert_eq!(api.count(MockOperation::GetRun), 3);
        assert_eq!(api.count(MockOperation::ListMessages), 1);
        assert_eq!(sleeper.delays(), vec![Duration::from_secs(1); 2]);
    }

    #[tokio::test]
    async fn immediate_completion_does_not_sleep() {
        let api = Arc::new(
            MockAssistantApi::new()
                .with_run_statuses(["completed"])
                .with_message(MessageRole::Assistant, "shipping"),
        );
        let sleeper = Arc::new(InstantSleeper::new());

        let result = handler(&api, &sleeper).handle(command()).await.unwrap();

        assert_eq!(result.attempts, 1);
        assert_eq!(sleeper.sleep_count(), 0);
    }

    #[tokio::test]
    async fn failed_run_stops_at_first_check() {
        let api = Arc::new(MockAssistantApi::new().with_run_statuses(["failed"]));
        let sleeper = Arc::new(InstantSleeper::new());

        let err = handler(&api, &sleeper).handle(command()).await.unwrap_err();

        match err {
            AwaitRunReplyError::RunFailed { status, run } => {
                assert_eq!(status, RunStatus::Failed);
                assert_eq!(run["id"], "run_1");
                assert_eq!(run["status"], "failed");
            }
            other => panic!("expected RunFailed, got {other:?}"),
        }
        assert_eq!(api.count(MockOperation::GetRun), 1);
        assert_eq!(api.count(MockOperation::ListMessages), 0);
    }

    #[tokio::test]
    async fn cancelled_and_expired_are_failures() {
        for label in ["cancelled", "expired"] {
            let api = Arc::new(MockAssistantApi::new().with_run_statuses(["in_progress", label]));
            let sleeper = Arc::new(InstantSleeper::new());

            let err = handler(&api, &sleeper).handle(command()).await.unwrap_err();

            assert!(matches!(
                err,
                AwaitRunReplyError::RunFailed { ref status, .. } if status.as_str() == label
            ));
            assert_eq!(api.count(MockOperation::GetRun), 2);
            assert_eq!(api.count(MockOperation::ListMessages), 0);
        }
    }

    #[tokio::test]
    async fn never_terminal_times_out_after_budget() {
        let api = Arc::new(MockAssistantApi::new().with_idle_status("in_progress"));
        let sleeper = Arc::new(InstantSleeper::new());

        let err = handler(&api, &sleeper).handle(command()).await.unwrap_err();

        assert_eq!(err, AwaitRunReplyError::TimedOut { attempts: 60 });
        assert_eq!(api.count(MockOperation::GetRun), 60);
        assert_eq!(api.count(MockOperation::ListMessages), 0);
        assert_eq!(sleeper.sleep_count(), 59);
        assert_eq!(sleeper.total_slept(), Duration::from_secs(59));
    }

    #[tokio::test]
    async fn unknown_status_keeps_waiting() {
        let api = Arc::new(
            MockAssistantApi::new()
                .with_run_statuses(["incomplete", "requires_action", "completed"])
                .with_message(MessageRole::Assistant, "returns"),
        );
        let sleeper = Arc::new(InstantSleeper::new());

        let result = handler(&api, &sleeper).handle(command()).await.unwrap();
        assert_eq!(result.attempts, 3);
    }

    #[tokio::test]
    async fn status_check_error_aborts_without_retry() {
        let api = Arc::new(
            MockAssistantApi::new()
                .with_run_statuses(["queued"])
                .with_run_error(UpstreamError::rejected(404, "No run found with id 'run_1'.")),
        );
        let sleeper = Arc::new(InstantSleeper::new());

        let err = handler(&api, &sleeper).handle(command()).await.unwrap_err();

        assert_eq!(
            err,
            AwaitRunReplyError::Upstream(UpstreamError::rejected(
                404,
                "No run found with id 'run_1'."
            ))
        );
        assert_eq!(api.count(MockOperation::GetRun), 2);
        assert_eq!(api.count(MockOperation::ListMessages), 0);
    }

    #[tokio::test]
    async fn completed_without_assistant_message() {
        let api = Arc::new(
            MockAssistantApi::new()
                .with_run_statuses(["completed"])
                .with_message(MessageRole::User, "anyone there?"),
        );
        let sleeper = Arc::new(InstantSleeper::new());

        let err = handler(&api, &sleeper).handle(command()).await.unwrap_err();

        assert_eq!(err, AwaitRunReplyError::NoAssistantMessage);
        assert_eq!(api.count(MockOperation::ListMessages), 1);
    }

    #[tokio::test]
    async fn listing_error_is_surfaced() {
        let api = Arc::new(
            MockAssistantApi::new()
                .with_run_statuses(["completed"])
                .with_error(MockOperation::ListMessages, UpstreamError::decode("bad json")),
        );
        let sleeper = Arc::new(InstantSleeper::new());

        let err = handler(&api, &sleeper).handle(command()).await.unwrap_err();
        assert_eq!(err, AwaitRunReplyError::Upstream(UpstreamError::decode("bad json")));
    }

    #[tokio::test]
    async fn backoff_schedule_is_followed() {
        let api = Arc::new(MockAssistantApi::new());
        let sleeper = Arc::new(InstantSleeper::new());
        let schedule = PollSchedule {
            max_attempts: 5,
            interval: Duration::from_millis(100),
            backoff_factor: 2.0,
            max_interval: Duration::from_millis(500),
        };
        let handler = AwaitRunReplyHandler::new(api.clone(), sleeper.clone(), schedule);

        let err = handler.handle(command()).await.unwrap_err();

        assert_eq!(err, AwaitRunReplyError::TimedOut { attempts: 5 });
        assert_eq!(
            sleeper.delays(),
            vec![
                Duration::from_millis(100),
                Duration::from_millis(200),
                Duration::from_millis(400),
                Duration::from_millis(500),
            ]
        );
    }
}
