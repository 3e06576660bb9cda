//! OpenAI Assistants client - Implementation of AssistantApi for OpenAI's API.
//!
//! Talks to the thread, message and run endpoints of the Assistants v2 API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIAssistantsConfig::new(api_key)
//!     .with_base_url("https://api.openai.com/v1")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let client = OpenAIAssistantsClient::new(config)?;
//! ```
//!
//! Every request carries the bearer token and the `OpenAI-Beta` protocol
//! header. Identifiers are percent-encoded as single path segments.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use std::time::Duration;

use crate::config::{UpstreamConfig, ValidationError};
use crate::domain::{Run, ThreadMessage};
use crate::ports::{AssistantApi, NewMessage, UpstreamError, UpstreamResponse};

/// Page size used when listing messages (the API maximum).
const MESSAGE_PAGE_LIMIT: &str = "100";

/// Upper bound on pages fetched for one listing.
const MAX_MESSAGE_PAGES: usize = 50;

/// Configuration for the OpenAI Assistants client.
#[derive(Debug, Clone)]
pub struct OpenAIAssistantsConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Value of the `OpenAI-Beta` header (default: assistants=v2).
    pub beta_header: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl OpenAIAssistantsConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://api.openai.com/v1".to_string(),
            beta_header: "assistants=v2".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the protocol-version header value.
    pub fn with_beta_header(mut self, value: impl Into<String>) -> Self {
        self.beta_header = value.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

impl TryFrom<&UpstreamConfig> for OpenAIAssistantsConfig {
    type Error = ValidationError;

    fn try_from(upstream: &UpstreamConfig) -> Result<Self, Self::Error> {
        let api_key = upstream
            .api_key
            .as_ref()
            .filter(|k| !k.expose_secret().is_empty())
            .ok_or(ValidationError::MissingRequired("OPENAI_API_KEY"))?;

        Ok(Self {
            api_key: api_key.clone(),
            base_url: upstream.base_url.clone(),
            beta_header: upstream.beta_header.clone(),
            timeout: upstream.timeout(),
        })
    }
}

/// OpenAI Assistants API client.
pub struct OpenAIAssistantsClient {
    config: OpenAIAssistantsConfig,
    base_url: Url,
    client: Client,
}

impl OpenAIAssistantsClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: OpenAIAssistantsConfig) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| UpstreamError::transport(format!("Invalid base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::transport(format!(
                "Invalid base URL: {}",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                UpstreamError::transport(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            config,
            base_url,
            client,
        })
    }

    /// Builds an endpoint URL from path segments below the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Starts a request with authentication and protocol headers attached.
    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.client
            .request(method, self.endpoint(segments))
            .bearer_auth(self.config.api_key())
            .header("Content-Type", "application/json")
            .header("OpenAI-Beta", self.config.beta_header.as_str())
    }

    fn post_json<T: Serialize + ?Sized>(&self, segments: &[&str], body: &T) -> RequestBuilder {
        self.request(Method::POST, segments).json(body)
    }

    /// Sends a request and normalizes the outcome.
    async fn send(&self, request: RequestBuilder) -> Result<UpstreamResponse, UpstreamError> {
        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::transport(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Upstream rejected request");
            return Err(UpstreamError::rejected(status.as_u16(), body));
        }

        let body = serde_json::from_str(&body)
            .map_err(|e| UpstreamError::decode(format!("Failed to parse response: {}", e)))?;

        Ok(UpstreamResponse::new(status.as_u16(), body))
    }

    fn transport_error(&self, e: reqwest::Error) -> UpstreamError {
        let err = if e.is_timeout() {
            UpstreamError::transport(format!(
                "Request timed out after {}s",
                self.config.timeout.as_secs()
            ))
        } else if e.is_connect() {
            UpstreamError::transport(format!("Connection failed: {}", e))
        } else {
            UpstreamError::transport(e.to_string())
        };
        tracing::error!(error = %err, "Upstream request failed");
        err
    }
}

#[async_trait]
impl AssistantApi for OpenAIAssistantsClient {
    async fn create_thread(&self) -> Result<UpstreamResponse, UpstreamError> {
        tracing::debug!("Creating thread");
        self.send(self.post_json(&["threads"], &serde_json::json!({}))).await
    }

    async fn post_message(
        &self,
        thread_id: &str,
        message: &NewMessage,
    ) -> Result<UpstreamResponse, UpstreamError> {
        tracing::debug!(thread_id, role = %message.role, "Posting message");
        self.send(self.post_json(&["threads", thread_id, "messages"], message))
            .await
    }

    async fn start_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<UpstreamResponse, UpstreamError> {
        tracing::debug!(thread_id, assistant_id, "Starting run");
        let body = StartRunBody { assistant_id };
        self.send(self.post_json(&["threads", thread_id, "runs"], &body))
            .await
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, UpstreamError> {
        let response = self
            .send(self.request(Method::GET, &["threads", thread_id, "runs", run_id]))
            .await?;

        Run::from_payload(response.body)
            .ok_or_else(|| UpstreamError::decode("Run object has no status"))
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, UpstreamError> {
        let mut messages = Vec::new();
        let mut after: Option<String> = None;

        for _ in 0..MAX_MESSAGE_PAGES {
            let mut request = self
                .request(Method::GET, &["threads", thread_id, "messages"])
                .query(&[("order", "asc"), ("limit", MESSAGE_PAGE_LIMIT)]);
            if let Some(cursor) = after.as_deref() {
                request = request.query(&[("after", cursor)]);
            }

            let page = parse_message_page(self.send(request).await?.body)?;
            tracing::debug!(thread_id, count = page.messages.len(), "Listed messages");
            messages.extend(page.messages);

            match page.next_cursor {
                None => return Ok(messages),
                Some(cursor) if after.as_deref() == Some(cursor.as_str()) => {
                    return Err(UpstreamError::decode(format!(
                        "Message listing repeated cursor {}",
                        cursor
                    )));
                }
                Some(cursor) => after = Some(cursor),
            }
        }

        Err(UpstreamError::decode(format!(
            "Message listing exceeded {} pages",
            MAX_MESSAGE_PAGES
        )))
    }
}

/// One page of a message listing.
#[derive(Debug)]
struct MessagePage {
    messages: Vec<ThreadMessage>,
    /// Cursor for the next page, if the listing continues.
    next_cursor: Option<String>,
}

fn parse_message_page(body: serde_json::Value) -> Result<MessagePage, UpstreamError> {
    let entries = body
        .get("data")
        .and_then(|d| d.as_array())
        .ok_or_else(|| UpstreamError::decode("Message list has no data array"))?;

    let messages: Vec<ThreadMessage> = entries
        .iter()
        .filter_map(ThreadMessage::from_payload)
        .collect();

    let has_more = body
        .get("has_more")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    let next_cursor = body
        .get("last_id")
        .and_then(|v| v.as_str())
        .filter(|_| has_more && !entries.is_empty())
        .map(str::to_string);

    Ok(MessagePage {
        messages,
        next_cursor,
    })
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct StartRunBody<'a> {
    assistant_id: &'a str,
}
