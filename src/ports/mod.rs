//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application layer and the outside world. Adapters implement these ports.
//!
//! - `AssistantApi` - Upstream thread/message/run service
//! - `Sleeper` - Wait between run status checks

mod assistant_api;
mod sleeper;

pub use assistant_api::{AssistantApi, NewMessage, UpstreamError, UpstreamResponse};
pub use sleeper::Sleeper;
