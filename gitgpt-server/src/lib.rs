//! HTTP gateway that turns natural-language git requests into shell commands.
//!
//! `POST /call-llm` forwards a conversation to the translation model with the
//! tool catalog attached. `POST /security-check` reports whether a command is
//! safe to run; unless the classifier is enabled it always answers `false`.

pub mod classifier;
pub mod config;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod routes;
mod telemetry;

use std::sync::Arc;

use anyhow::Context;
use gitgpt_core::{ChatBackend, GitgptError, Retrying};
use gitgpt_llm::GroqClient;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub use classifier::{verdict_is_destructive, SafetyClassifier};
pub use config::{LogFormat, ServerConfig};
pub use error::ApiError;
pub use gateway::{
    Gateway, GatewayOptions, SafetyCheckRequest, SafetyCheckResponse, TranslateRequest,
    TranslateResponse,
};
pub use routes::{app, HttpLimits};
pub use telemetry::init_tracing;

/// Builds the production backend: Groq over HTTPS, retried per config.
pub fn build_backend(config: &ServerConfig) -> Result<Arc<dyn ChatBackend>, GitgptError> {
    let client = GroqClient::with_options(
        config.api_key.clone(),
        &config.base_url,
        config.request_timeout(),
    )?;
    Ok(Arc::new(Retrying::new(client, config.max_attempts)))
}

pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    let backend = build_backend(&config)?;
    let gateway = Arc::new(Gateway::new(backend, config.gateway_options()));
    let router = app(gateway, config.limits());

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(addr = %config.bind, base_url = %config.base_url, "gitgpt server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("gitgpt server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received, draining in-flight requests"),
        Err(err) => {
            warn!(%err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
