//! Mock Assistant API for testing.
//!
//! Provides a scriptable implementation of the AssistantApi port, allowing
//! tests to run without calling the real upstream service.
//!
//! # Features
//!
//! - Scripted run status sequences
//! - Canned message listings
//! - Error injection per operation
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let api = MockAssistantApi::new()
//!     .with_run_statuses(["queued", "in_progress", "completed"])
//!     .with_messages(vec![ThreadMessage { .. }]);
//!
//! let run = api.get_run("thread_1", "run_1").await?;
//! assert_eq!(api.count(MockOperation::GetRun), 1);
//! ```

use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::{MessageRole, Run, ThreadMessage};
use crate::ports::{AssistantApi, NewMessage, UpstreamError, UpstreamResponse};

/// Operations of the AssistantApi port, for call counting and error injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    CreateThread,
    PostMessage,
    StartRun,
    GetRun,
    ListMessages,
}

/// A recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    CreateThread,
    PostMessage {
        thread_id: String,
        message: NewMessage,
    },
    StartRun {
        thread_id: String,
        assistant_id: String,
    },
    GetRun {
        thread_id: String,
        run_id: String,
    },
    ListMessages {
        thread_id: String,
    },
}

impl MockCall {
    pub fn operation(&self) -> MockOperation {
        match self {
            MockCall::CreateThread => MockOperation::CreateThread,
            MockCall::PostMessage { .. } => MockOperation::PostMessage,
            MockCall::StartRun { .. } => MockOperation::StartRun,
            MockCall::GetRun { .. } => MockOperation::GetRun,
            MockCall::ListMessages { .. } => MockOperation::ListMessages,
        }
    }
}

/// A scripted answer to a run status check.
#[derive(Debug, Clone)]
enum MockRunStep {
    /// Report this status label.
    Status(String),
    /// Fail the status check.
    Error(UpstreamError),
}

/// Mock assistant API for testing.
#[derive(Debug, Clone)]
pub struct MockAssistantApi {
    /// Run status answers (consumed in order).
    run_steps: Arc<Mutex<VecDeque<MockRunStep>>>,
    /// Status reported once the script is exhausted.
    idle_status: String,
    /// Messages returned by the listing, oldest first.
    messages: Vec<ThreadMessage>,
    /// Errors returned by an operation instead of its normal answer.
    errors: HashMap<MockOperation, UpstreamError>,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl Default for MockAssistantApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAssistantApi {
    /// Creates a mock whose runs stay queued forever and whose threads are empty.
    pub fn new() -> Self {
        Self {
            run_steps: Arc::new(Mutex::new(VecDeque::new())),
            idle_status: "queued".to_string(),
            messages: Vec::new(),
            errors: HashMap::new(),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues status labels reported by consecutive run checks.
    pub fn with_run_statuses<I, S>(self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut steps = self.run_steps.lock().unwrap();
        steps.extend(statuses.into_iter().map(|s| MockRunStep::Status(s.into())));
        drop(steps);
        self
    }

    /// Queues a failing run check.
    pub fn with_run_error(self, error: UpstreamError) -> Self {
        let mut steps = self.run_steps.lock().unwrap();
        steps.push_back(MockRunStep::Error(error));
        drop(steps);
        self
    }

    /// Sets the status reported after the script runs out.
    pub fn with_idle_status(mut self, status: impl Into<String>) -> Self {
        self.idle_status = status.into();
        self
    }

    /// Sets the messages returned by the listing (oldest first).
    pub fn with_messages(mut self, messages: Vec<ThreadMessage>) -> Self {
        self.messages = messages;
        self
    }

    /// Appends a message to the listing.
    pub fn with_message(mut self, role: MessageRole, text: impl Into<String>) -> Self {
        let id = format!("msg_{}", self.messages.len() + 1);
        self.messages.push(ThreadMessage {
            id,
            role,
            text: text.into(),
        });
        self
    }

    /// Makes every call to `operation` fail with `error`.
    pub fn with_error(mut self, operation: MockOperation, error: UpstreamError) -> Self {
        self.errors.insert(operation, error);
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this API.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns the number of calls made to one operation.
    pub fn count(&self, operation: MockOperation) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation() == operation)
            .count()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Records the call, waits, and returns the injected error if any.
    async fn enter(&self, call: MockCall) -> Result<(), UpstreamError> {
        let operation = call.operation();
        self.calls.lock().unwrap().push(call);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.errors.get(&operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn next_run_step(&self) -> MockRunStep {
        self.run_steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockRunStep::Status(self.idle_status.clone()))
    }
}

#[async_trait]
impl AssistantApi for MockAssistantApi {
    async fn create_thread(&self) -> Result<UpstreamResponse, UpstreamError> {
        self.enter(MockCall::CreateThread).await?;
        Ok(UpstreamResponse::ok(json!({
            "id": "thread_mock",
            "object": "thread",
            "metadata": {}
        })))
    }

    async fn post_message(
        &self,
        thread_id: &str,
        message: &NewMessage,
    ) -> Result<UpstreamResponse, UpstreamError> {
        self.enter(MockCall::PostMessage {
            thread_id: thread_id.to_string(),
            message: message.clone(),
        })
        .await?;
        Ok(UpstreamResponse::ok(json!({
            "id": format!("msg_{}", self.messages.len() + 1),
            "object": "thread.message",
            "thread_id": thread_id,
            "role": message.role,
            "content": [{"type": "text", "text": {"value": message.content, "annotations": []}}]
        })))
    }

    async fn start_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<UpstreamResponse, UpstreamError> {
        self.enter(MockCall::StartRun {
            thread_id: thread_id.to_string(),
            assistant_id: assistant_id.to_string(),
        })
        .await?;
        Ok(UpstreamResponse::ok(json!({
            "id": "run_mock",
            "object": "thread.run",
            "thread_id": thread_id,
            "assistant_id": assistant_id,
            "status": "queued"
        })))
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, UpstreamError> {
        self.enter(MockCall::GetRun {
            thread_id: thread_id.to_string(),
            run_id: run_id.to_string(),
        })
        .await?;

        match self.next_run_step() {
            MockRunStep::Status(status) => {
                let payload = json!({
                    "id": run_id,
                    "object": "thread.run",
                    "thread_id": thread_id,
                    "status": status
                });
                Run::from_payload(payload).ok_or_else(|| UpstreamError::decode("mock run"))
            }
            MockRunStep::Error(err) => Err(err),
        }
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, UpstreamError> {
        self.enter(MockCall::ListMessages {
            thread_id: thread_id.to_string(),
        })
        .await?;
        Ok(self.messages.clone())
    }
}
