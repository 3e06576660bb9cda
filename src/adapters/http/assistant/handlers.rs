//! HTTP handlers for the proxy endpoints.
//!
//! These handlers connect Axum routes to the application layer handlers and
//! own the single mapping from handler errors to HTTP responses.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::handlers::assistant::{
    AwaitRunReplyCommand, AwaitRunReplyError, AwaitRunReplyHandler, CreateThreadHandler,
    SendQueryCommand, SendQueryError, SendQueryHandler, StartRunCommand, StartRunError,
    StartRunHandler,
};
use crate::domain::{PollSchedule, RunStatus};
use crate::ports::{AssistantApi, Sleeper, UpstreamError, UpstreamResponse};

use super::dto::{
    AssistantReplyResponse, ErrorResponse, IndexResponse, SendQueryRequest, StartRunRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
#[derive(Clone)]
pub struct ProxyAppState {
    pub api: Arc<dyn AssistantApi>,
    pub sleeper: Arc<dyn Sleeper>,
    pub schedule: PollSchedule,
}

impl ProxyAppState {
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

    pub fn create_thread_handler(&self) -> CreateThreadHandler {
        CreateThreadHandler::new(self.api.clone())
    }

    pub fn send_query_handler(&self) -> SendQueryHandler {
        SendQueryHandler::new(self.api.clone())
    }

    pub fn start_run_handler(&self) -> StartRunHandler {
        StartRunHandler::new(self.api.clone())
    }

    pub fn await_run_reply_handler(&self) -> AwaitRunReplyHandler {
        AwaitRunReplyHandler::new(
            self.api.clone(),
            self.sleeper.clone(),
            self.schedule.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse::default())
}

/// POST /create_thread
pub async fn create_thread(
    State(state): State<ProxyAppState>,
) -> Result<impl IntoResponse, ProxyApiError> {
    let response = state
        .create_thread_handler()
        .handle()
        .await
        .map_err(|e| ProxyApiError::upstream(UpstreamContext::CreateThread, e))?;

    Ok(passthrough(response))
}

/// POST /send_query/:thread_id
pub async fn send_query(
    State(state): State<ProxyAppState>,
    Path(thread_id): Path<String>,
    payload: Result<Json<SendQueryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ProxyApiError> {
    let Json(req) = payload.map_err(ProxyApiError::from)?;

    let cmd = SendQueryCommand {
        thread_id,
        role: req.role,
        content: req.content,
    };
    let response = state.send_query_handler().handle(cmd).await?;

    Ok(passthrough(response))
}

/// POST /start_run/:thread_id
pub async fn start_run(
    State(state): State<ProxyAppState>,
    Path(thread_id): Path<String>,
    payload: Result<Json<StartRunRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ProxyApiError> {
    let Json(req) = payload.map_err(ProxyApiError::from)?;

    let cmd = StartRunCommand {
        thread_id,
        assistant_id: req.assistant_id,
    };
    let response = state.start_run_handler().handle(cmd).await?;

    Ok(passthrough(response))
}

/// GET /get_category/:thread_id/:run_id
///
/// Blocks until the run finishes or the polling budget runs out.
pub async fn get_category(
    State(state): State<ProxyAppState>,
    Path((thread_id, run_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ProxyApiError> {
    let cmd = AwaitRunReplyCommand { thread_id, run_id };
    let result = state.await_run_reply_handler().handle(cmd).await?;

    Ok(Json(AssistantReplyResponse {
        assistant_message: result.reply.text,
    }))
}

/// Relays an upstream success with its own status code.
fn passthrough(response: UpstreamResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::OK);
    (status, Json(response.body)).into_response()
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// Which upstream step failed, for the error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamContext {
    CreateThread,
    SendQuery,
    StartRun,
    AwaitReply,
}

impl UpstreamContext {
    fn message(self) -> &'static str {
        match self {
            UpstreamContext::CreateThread => "Failed to create thread",
            UpstreamContext::SendQuery => "Failed to send query",
            UpstreamContext::StartRun => "Failed to start run",
            UpstreamContext::AwaitReply => "Failed to get assistant response",
        }
    }
}

/// API error type that converts handler errors to HTTP responses.
#[derive(Debug)]
pub enum ProxyApiError {
    BadRequest(String),
    Upstream {
        context: UpstreamContext,
        error: UpstreamError,
    },
    RunFailed {
        status: RunStatus,
        run: serde_json::Value,
    },
    NoAssistantMessage,
    TimedOut {
        attempts: u32,
    },
}

impl ProxyApiError {
    pub fn upstream(context: UpstreamContext, error: UpstreamError) -> Self {
        ProxyApiError::Upstream { context, error }
    }
}

impl From<JsonRejection> for ProxyApiError {
    fn from(rejection: JsonRejection) -> Self {
        ProxyApiError::BadRequest(rejection.body_text())
    }
}

impl From<SendQueryError> for ProxyApiError {
    fn from(err: SendQueryError) -> Self {
        match err {
            SendQueryError::MissingFields => ProxyApiError::BadRequest(err.to_string()),
            SendQueryError::Upstream(e) => ProxyApiError::upstream(UpstreamContext::SendQuery, e),
        }
    }
}

impl From<StartRunError> for ProxyApiError {
    fn from(err: StartRunError) -> Self {
        match err {
            StartRunError::MissingAssistantId => ProxyApiError::BadRequest(err.to_string()),
            StartRunError::Upstream(e) => ProxyApiError::upstream(UpstreamContext::StartRun, e),
        }
    }
}

impl From<AwaitRunReplyError> for ProxyApiError {
    fn from(err: AwaitRunReplyError) -> Self {
        match err {
            AwaitRunReplyError::RunFailed { status, run } => {
                ProxyApiError::RunFailed { status, run }
            }
            AwaitRunReplyError::TimedOut { attempts } => ProxyApiError::TimedOut { attempts },
            AwaitRunReplyError::NoAssistantMessage => ProxyApiError::NoAssistantMessage,
            AwaitRunReplyError::Upstream(e) => {
                ProxyApiError::upstream(UpstreamContext::AwaitReply, e)
            }
        }
    }
}

impl IntoResponse for ProxyApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ProxyApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            ProxyApiError::Upstream {
                context,
                error: UpstreamError::Rejected { status, body },
            } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                ErrorResponse::new(context.message()).with_details(body),
            ),
            ProxyApiError::Upstream { context, error } => {
                tracing::error!(error = %error, "{}", context.message());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(context.message()),
                )
            }
            ProxyApiError::RunFailed { status, run } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Run failed")
                    .with_status(status.as_str())
                    .with_details(run),
            ),
            ProxyApiError::NoAssistantMessage => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("No assistant message found"),
            ),
            ProxyApiError::TimedOut { attempts } => (
                StatusCode::GATEWAY_TIMEOUT,
                ErrorResponse::new("Run timed out").with_attempts(attempts),
            ),
        };

        (status, Json(error)).into_response()
    }
}
