//! Request handling behind the two HTTP operations, independent of axum.

use std::sync::Arc;

use gitgpt_core::{
    ChatBackend, CompletionResult, ConversationState, GitgptError, Message, Role, WireToolCall,
};
use gitgpt_llm::CompletionAdapter;
use gitgpt_prompt::{task_conversation, tool_catalog};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::classifier::SafetyClassifier;

pub const DEFAULT_TRANSLATE_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_CLASSIFIER_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_TEMPERATURE: f32 = 1.0;

#[derive(Clone, Debug)]
pub struct GatewayOptions {
    pub translate_model: String,
    pub classifier_model: String,
    /// When false, every command is reported unsafe without a backend call.
    pub classifier_enabled: bool,
    pub classifier_tools: bool,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            translate_model: DEFAULT_TRANSLATE_MODEL.to_string(),
            classifier_model: DEFAULT_CLASSIFIER_MODEL.to_string(),
            classifier_enabled: false,
            classifier_tools: true,
        }
    }
}

/// Body of `POST /call-llm`. Every field is optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    #[serde(default)]
    pub messages: Option<Vec<Message>>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default, alias = "tool_use")]
    pub tool_use: Option<bool>,
    /// Free-form request; seeds the system prompt and a wrapped user turn.
    #[serde(default)]
    pub task: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TranslateResponse {
    pub role: Role,
    pub content: Option<String>,
    pub tool_calls: Vec<WireToolCall>,
}

impl From<CompletionResult> for TranslateResponse {
    fn from(result: CompletionResult) -> Self {
        Self {
            role: Role::Assistant,
            content: result.text,
            tool_calls: result.tool_calls.into_iter().map(WireToolCall::from).collect(),
        }
    }
}

/// Body of `POST /security-check`. A `command` that is not a string is
/// accepted and classified as the empty command.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SafetyCheckRequest {
    #[serde(default)]
    pub command: Option<Value>,
}

impl SafetyCheckRequest {
    pub fn command(&self) -> &str {
        self.command.as_ref().and_then(Value::as_str).unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SafetyCheckResponse {
    pub is_safe: bool,
}

pub struct Gateway {
    adapter: CompletionAdapter,
    classifier: SafetyClassifier,
    options: GatewayOptions,
}

impl Gateway {
    pub fn new(backend: Arc<dyn ChatBackend>, options: GatewayOptions) -> Self {
        let adapter = CompletionAdapter::new(backend, tool_catalog());
        let classifier = SafetyClassifier::new(
            adapter.clone(),
            options.classifier_model.clone(),
            options.classifier_tools,
        );
        info!(
            translate_model = %options.translate_model,
            classifier_model = %classifier.model(),
            classifier_enabled = options.classifier_enabled,
            "gateway ready"
        );
        Self {
            adapter,
            classifier,
            options,
        }
    }

    /// Forwards the conversation to the translation model and returns the
    /// assistant turn, tool calls included.
    pub async fn translate(
        &self,
        request: TranslateRequest,
    ) -> Result<TranslateResponse, GitgptError> {
        let temperature = request.temperature.unwrap_or(DEFAULT_TEMPERATURE);
        let tool_use = request.tool_use.unwrap_or(true);

        let mut messages = match request.task.as_deref() {
            Some(task) => task_conversation(task)?,
            None => Vec::new(),
        };
        messages.extend(request.messages.unwrap_or_default());

        let state = ConversationState::from_history(&messages);
        debug!(
            messages = messages.len(),
            temperature,
            tool_use,
            state = state.label(),
            "translating"
        );

        let result = self
            .adapter
            .complete(&self.options.translate_model, messages, temperature, tool_use)
            .await?;
        Ok(result.into())
    }

    pub async fn check_safety(
        &self,
        request: SafetyCheckRequest,
    ) -> Result<SafetyCheckResponse, GitgptError> {
        if !self.options.classifier_enabled {
            debug!("safety classifier disabled, reporting command as unsafe");
            return Ok(SafetyCheckResponse { is_safe: false });
        }

        let destructive = self.classifier.is_destructive(request.command()).await?;
        Ok(SafetyCheckResponse {
            is_safe: !destructive,
        })
    }
}
