use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitgptError {
    #[error("LLM backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("LLM backend returned HTTP {status}: {message}")]
    BackendStatus { status: u16, message: String },
    #[error("LLM backend returned no completion choices")]
    EmptyCompletion,
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
    #[error("Max retries ({max}) exceeded: {last}")]
    MaxRetriesExceeded {
        max: usize,
        #[source]
        last: Box<GitgptError>,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Unknown tool '{0}'")]
    UnknownTool(String),
    #[error("Serialization/deserialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl GitgptError {
    /// Whether repeating the same backend call could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            GitgptError::BackendUnavailable(_) | GitgptError::Timeout(_) => true,
            GitgptError::BackendStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
