//! StartRunHandler - Start an assistant run over a thread

use std::sync::Arc;

use crate::ports::{AssistantApi, UpstreamError, UpstreamResponse};

/// Command to start a run
#[derive(Debug, Clone)]
pub struct StartRunCommand {
    pub thread_id: String,
    pub assistant_id: Option<String>,
}

/// Error type for starting runs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StartRunError {
    #[error("assistant_id is required")]
    MissingAssistantId,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Handler for starting runs
pub struct StartRunHandler {
    api: Arc<dyn AssistantApi>,
}

impl StartRunHandler {
    pub fn new(api: Arc<dyn AssistantApi>) -> Self {
        Self { api }
    }

    pub async fn handle(&self, cmd: StartRunCommand) -> Result<UpstreamResponse, StartRunError> {
        let assistant_id = cmd
            .assistant_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(StartRunError::MissingAssistantId)?;

        Ok(self.api.start_run(&cmd.thread_id, &assistant_id).await?)
    }
}
