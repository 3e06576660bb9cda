//! HTTP DTOs (Data Transfer Objects) for the proxy endpoints.
//!
//! Request fields are optional so that missing values surface as a 400 from
//! the application handlers instead of a deserialization rejection.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to append a message to a thread.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendQueryRequest {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Request to start a run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartRunRequest {
    #[serde(default)]
    pub assistant_id: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Liveness greeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexResponse {
    pub message: String,
}

impl Default for IndexResponse {
    fn default() -> Self {
        Self {
            message: "Hello, world!".to_string(),
        }
    }
}

/// Final assistant reply of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantReplyResponse {
    pub assistant_message: String,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Upstream body, run payload, or transport message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Terminal status of a failed run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Status checks made before giving up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            status: None,
            attempts: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<serde_json::Value>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = Some(attempts);
        self
    }
}
