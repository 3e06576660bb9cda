//! Route definitions for the proxy endpoints

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{create_thread, get_category, index, send_query, start_run, ProxyAppState};

/// Create the proxy router with all endpoints
///
/// # Endpoints
///
/// - `GET /` - Liveness greeting
/// - `POST /create_thread` - Create a thread
/// - `POST /send_query/:thread_id` - Append a message
/// - `POST /start_run/:thread_id` - Start a run
/// - `GET /get_category/:thread_id/:run_id` - Wait for the run's assistant reply
pub fn proxy_router() -> Router<ProxyAppState> {
    Router::new()
        .route("/", get(index))
        .route("/create_thread", post(create_thread))
        .route("/send_query/:thread_id", post(send_query))
        .route("/start_run/:thread_id", post(start_run))
        .route("/get_category/:thread_id/:run_id", get(get_category))
}
