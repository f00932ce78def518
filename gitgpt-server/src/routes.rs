use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::extract::LenientJson;
use crate::gateway::{
    Gateway, SafetyCheckRequest, SafetyCheckResponse, TranslateRequest, TranslateResponse,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HttpLimits {
    pub max_body_bytes: usize,
    /// In-flight requests across all routes.
    pub max_concurrency: usize,
}

impl Default for HttpLimits {
    fn default() -> Self {
        Self {
            max_body_bytes: 1024 * 1024,
            max_concurrency: 64,
        }
    }
}

pub fn app(gateway: Arc<Gateway>, limits: HttpLimits) -> Router {
    Router::new()
        .route("/call-llm", post(call_llm))
        .route("/security-check", post(security_check))
        .route("/health", get(health))
        .with_state(gateway)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(limits.max_body_bytes))
        .layer(GlobalConcurrencyLimitLayer::new(limits.max_concurrency))
        .layer(TraceLayer::new_for_http())
}

async fn call_llm(
    State(gateway): State<Arc<Gateway>>,
    LenientJson(request): LenientJson<TranslateRequest>,
) -> Result<Json<TranslateResponse>, ApiError> {
    Ok(Json(gateway.translate(request).await?))
}

async fn security_check(
    State(gateway): State<Arc<Gateway>>,
    LenientJson(request): LenientJson<SafetyCheckRequest>,
) -> Result<Json<SafetyCheckResponse>, ApiError> {
    Ok(Json(gateway.check_safety(request).await?))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}
