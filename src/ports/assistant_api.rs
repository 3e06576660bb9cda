//! Assistant API Port - Interface for the upstream thread/message/run service.
//!
//! This port abstracts every call the proxy makes against the remote assistant
//! API, so the application handlers can be exercised against a scripted mock.
//!
//! # Contract
//!
//! - One network request per call, no retry at this layer
//! - Upstream success: parsed body returned verbatim
//! - Upstream non-success: [`UpstreamError::Rejected`] with status and raw body
//! - Network or parse failure: [`UpstreamError::Transport`] / [`UpstreamError::Decode`]

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Run, ThreadMessage};

/// Port for the upstream assistant service.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    /// Create a thread with no initial messages.
    async fn create_thread(&self) -> Result<UpstreamResponse, UpstreamError>;

    /// Append a message to a thread.
    async fn post_message(
        &self,
        thread_id: &str,
        message: &NewMessage,
    ) -> Result<UpstreamResponse, UpstreamError>;

    /// Start a run of the given assistant over a thread.
    async fn start_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<UpstreamResponse, UpstreamError>;

    /// Fetch the current state of a run.
    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, UpstreamError>;

    /// List a thread's messages, oldest first.
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, UpstreamError>;
}

/// Message submitted to a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMessage {
    pub role: String,
    pub content: String,
}

impl NewMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Successful upstream reply for pass-through operations.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    /// HTTP status the upstream answered with.
    pub status: u16,
    /// Parsed response body, untouched.
    pub body: serde_json::Value,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    /// A 200 reply.
    pub fn ok(body: serde_json::Value) -> Self {
        Self::new(200, body)
    }
}

/// Upstream call errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamError {
    /// The upstream answered with a non-success status.
    #[error("upstream rejected request with status {status}")]
    Rejected {
        /// Upstream HTTP status.
        status: u16,
        /// Raw response body, for diagnostic passthrough.
        body: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("transport error: {0}")]
    Transport(String),

    /// The upstream answered with a success status but an unusable body.
    #[error("malformed upstream response: {0}")]
    Decode(String),
}

impl UpstreamError {
    /// Creates a rejection error.
    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            body: body.into(),
        }
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Returns true if the upstream itself reported the failure.
    pub fn is_rejection(&self) -> bool {
        matches!(self, UpstreamError::Rejected { .. })
    }
}
