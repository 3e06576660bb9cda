//! CreateThreadHandler - Open a new, empty conversation thread upstream

use std::sync::Arc;

use crate::ports::{AssistantApi, UpstreamError, UpstreamResponse};

/// Handler for creating threads
pub struct CreateThreadHandler {
    api: Arc<dyn AssistantApi>,
}

impl CreateThreadHandler {
    pub fn new(api: Arc<dyn AssistantApi>) -> Self {
        Self { api }
    }

    pub async fn handle(&self) -> Result<UpstreamResponse, UpstreamError> {
        self.api.create_thread().await
    }
}
