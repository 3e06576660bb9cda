//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid server host {0:?}: must be an IP address")]
    InvalidHost(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid upstream base URL: must start with http:// or https://")]
    InvalidBaseUrl,

    #[error("Invalid upstream request timeout")]
    InvalidTimeout,

    #[error("Polling max_attempts must be at least 1")]
    InvalidPollAttempts,

    #[error("Polling interval must be greater than zero")]
    InvalidPollInterval,

    #[error("Polling backoff factor must be at least 1.0")]
    InvalidBackoffFactor,

    #[error("Polling max interval must not be shorter than the base interval")]
    InvalidMaxInterval,
}
