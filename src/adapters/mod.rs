//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `ai` - Upstream assistant API clients (OpenAI, mock)
//! - `http` - Axum routes exposed by the proxy
//! - `time` - Sleepers used between run status checks

pub mod ai;
pub mod http;
pub mod time;

pub use ai::{OpenAIAssistantsClient, OpenAIAssistantsConfig};
pub use time::TokioSleeper;
