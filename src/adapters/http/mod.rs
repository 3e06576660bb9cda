//! HTTP adapters - REST API implementations.
//!
//! `router` assembles the proxy endpoints with request tracing and
//! `x-request-id` tagging.

pub mod assistant;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub use assistant::{proxy_router, ProxyAppState};

/// Build the complete application router.
pub fn router(state: ProxyAppState) -> Router {
    proxy_router().with_state(state).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id()),
    )
}
