use std::time::Duration;

use tracing::warn;

use crate::{ChatBackend, ChatCompletion, ChatRequest, GitgptError};

const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(200);

/// Bounded retry around a backend call, doubling the delay between attempts.
pub struct Retrying<B> {
    backend: B,
    max_attempts: usize,
    initial_backoff: Duration,
}

impl<B> Retrying<B> {
    pub fn new(backend: B, max_attempts: usize) -> Self {
        Self {
            backend,
            max_attempts,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
        }
    }

    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }
}

#[async_trait::async_trait]
impl<B> ChatBackend for Retrying<B>
where
    B: ChatBackend,
{
    async fn chat_complete(&self, request: ChatRequest) -> Result<ChatCompletion, GitgptError> {
        if self.max_attempts == 0 {
            return Err(GitgptError::InvalidConfig(
                "retry policy needs at least one attempt".to_string(),
            ));
        }

        let mut backoff = self.initial_backoff;
        let mut attempt = 1;
        loop {
            let error = match self.backend.chat_complete(request.clone()).await {
                Ok(completion) => return Ok(completion),
                Err(error) => error,
            };

            if !error.is_transient() || self.max_attempts == 1 {
                return Err(error);
            }
            if attempt == self.max_attempts {
                return Err(GitgptError::MaxRetriesExceeded {
                    max: self.max_attempts,
                    last: Box::new(error),
                });
            }

            warn!(attempt, max_attempts = self.max_attempts, %error, "retrying backend call");
            tokio::time::sleep(backoff).await;
            backoff = backoff.saturating_mul(2);
            attempt += 1;
        }
    }
}
