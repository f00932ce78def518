//! Groq LLM client

use std::time::Duration;

use gitgpt_core::{ChatBackend, ChatCompletion, ChatRequest, GitgptError};
use secrecy::SecretString;

use crate::openai_compatible::OpenAiCompatibleClient;

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Groq LLM client
#[derive(Clone, Debug)]
pub struct GroqClient(OpenAiCompatibleClient);

impl GroqClient {
    /// Create a client against Groq's public endpoint
    pub fn new(api_key: SecretString) -> Result<Self, GitgptError> {
        Self::with_options(api_key, GROQ_BASE_URL, Duration::from_secs(60))
    }

    /// Create a client with a custom endpoint and request timeout
    pub fn with_options(
        api_key: SecretString,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, GitgptError> {
        let client = OpenAiCompatibleClient::builder()
            .base_url(base_url)?
            .api_key(api_key)
            .timeout(timeout)
            .build()?;
        Ok(Self(client))
    }
}

#[async_trait::async_trait]
impl ChatBackend for GroqClient {
    async fn chat_complete(&self, request: ChatRequest) -> Result<ChatCompletion, GitgptError> {
        self.0.chat_complete(request).await
    }
}
