//! HTTP adapters for the assistant proxy
//!
//! Exposes the thread, message and run endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{ProxyApiError, ProxyAppState, UpstreamContext};
pub use routes::proxy_router;
