//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `ASSISTANT_PROXY` prefix and nested values use double underscores as separators.
//!
//! The conventional `OPENAI_API_KEY` and `PORT` variables are also honoured,
//! with lower priority than their prefixed counterparts.
//!
//! # Example
//!
//! ```no_run
//! use assistant_proxy::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! let addr = config.server.socket_addr().expect("Invalid host");
//! println!("Server running on {}", addr);
//! ```

mod error;
mod polling;
mod server;
mod upstream;

pub use error::{ConfigError, ValidationError};
pub use polling::PollingConfig;
pub use server::ServerConfig;
pub use upstream::UpstreamConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Built once at startup and handed to the components that need it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, log filter)
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream assistant API (key, base URL, protocol header)
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Run polling budget
    #[serde(default)]
    pub polling: PollingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Seeds defaults from `OPENAI_API_KEY` and `PORT` when set
    /// 3. Reads environment variables with `ASSISTANT_PROXY` prefix
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `ASSISTANT_PROXY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `ASSISTANT_PROXY__POLLING__MAX_ATTEMPTS=30` -> `polling.max_attempts = 30`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            builder = builder.set_default("upstream.api_key", key)?;
        }
        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_default("server.port", port)?;
        }

        let config = builder
            .add_source(
                config::Environment::default()
                    .prefix("ASSISTANT_PROXY")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.upstream.validate()?;
        self.polling.validate()?;
        Ok(())
    }
}
