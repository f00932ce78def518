use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gitgpt_core::GitgptError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Body sent to clients for any backend failure. Details stay in the logs.
pub const BACKEND_FAILURE_MESSAGE: &str = "llm backend request failed";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never reached the gateway: bad JSON, oversized body.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error(transparent)]
    Backend(#[from] GitgptError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Rejected {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Rejected { status, message } => {
                (status, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Backend(err) => {
                error!(error = %err, transient = err.is_transient(), "llm backend request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": BACKEND_FAILURE_MESSAGE })),
                )
                    .into_response()
            }
        }
    }
}
