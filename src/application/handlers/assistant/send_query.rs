//! SendQueryHandler - Validate and append a message to a thread

use std::sync::Arc;

use crate::ports::{AssistantApi, NewMessage, UpstreamError, UpstreamResponse};

/// Command to append a message to a thread
#[derive(Debug, Clone)]
pub struct SendQueryCommand {
    pub thread_id: String,
    pub role: Option<String>,
    pub content: Option<String>,
}

/// Error type for sending queries
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SendQueryError {
    /// Role or content missing; nothing was sent upstream
    #[error("role and content are required")]
    MissingFields,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Handler for sending queries
pub struct SendQueryHandler {
    api: Arc<dyn AssistantApi>,
}

impl SendQueryHandler {
    pub fn new(api: Arc<dyn AssistantApi>) -> Self {
        Self { api }
    }

    pub async fn handle(&self, cmd: SendQueryCommand) -> Result<UpstreamResponse, SendQueryError> {
        let message = Self::validate(cmd.role, cmd.content)?;
        Ok(self.api.post_message(&cmd.thread_id, &message).await?)
    }

    fn validate(
        role: Option<String>,
        content: Option<String>,
    ) -> Result<NewMessage, SendQueryError> {
        match (role, content) {
            (Some(role), Some(content))
                if !role.trim().is_empty() && !content.trim().is_empty() =>
            {
                Ok(NewMessage::new(role, content))
            }
            _ => Err(SendQueryError::MissingFields),
        }
    }
}
