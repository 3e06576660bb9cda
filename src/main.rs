//! Assistant proxy server binary.

use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use assistant_proxy::adapters::http::{router, ProxyAppState};
use assistant_proxy::adapters::{OpenAIAssistantsClient, OpenAIAssistantsConfig, TokioSleeper};
use assistant_proxy::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let client = OpenAIAssistantsClient::new(OpenAIAssistantsConfig::try_from(&config.upstream)?)?;
    let schedule = config.polling.schedule();
    tracing::info!(
        base_url = %config.upstream.base_url,
        max_attempts = schedule.max_attempts,
        interval_ms = config.polling.interval_ms,
        max_wait_secs = schedule.total_wait().as_secs_f64(),
        "Upstream client ready"
    );

    let state = ProxyAppState::new(Arc::new(client), Arc::new(TokioSleeper), schedule);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Assistant proxy listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Assistant proxy stopped");
    Ok(())
}

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .ok();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
