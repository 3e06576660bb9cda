//! Upstream assistant API configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upstream (OpenAI Assistants) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// OpenAI API key
    pub api_key: Option<Secret<String>>,

    /// Base URL of the API, without a trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value sent in the `OpenAI-Beta` protocol-version header
    #[serde(default = "default_beta_header")]
    pub beta_header: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Validate upstream configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired("OPENAI_API_KEY"));
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            beta_header: default_beta_header(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_beta_header() -> String {
    "assistants=v2".to_string()
}

fn default_timeout() -> u64 {
    30
}
