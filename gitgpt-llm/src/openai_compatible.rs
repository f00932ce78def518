//! Generic OpenAI-compatible LLM client
//!
//! Supports any provider exposing OpenAI's chat-completions format (Groq,
//! OpenAI, Together, local servers).

use std::fmt;
use std::time::Duration;

use gitgpt_core::{
    ChatBackend, ChatChoice, ChatCompletion, ChatRequest, GitgptError, Message, RawToolCall, Role,
    ToolChoice, ToolSpec, Value, WireToolCall,
};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Request body for the chat completions endpoint
#[derive(Serialize, Debug, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ApiMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ApiTool>>,
    pub tool_choice: ToolChoice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub stream: bool,
}

#[derive(Serialize, Debug, Clone)]
pub struct ApiMessage {
    pub role: Role,
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ApiToolCall>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    pub function: ApiFunctionCall,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiFunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct ApiTool {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: ApiFunction,
}

#[derive(Serialize, Debug, Clone)]
pub struct ApiFunction {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

fn function_kind() -> String {
    "function".to_string()
}

/// Non-streaming response from chat completions
#[derive(Deserialize, Debug, Clone)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ApiToolCall>>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// OpenAI-style error response
#[derive(Deserialize, Debug, Clone)]
pub struct OpenAiError {
    pub error: ErrorDetail,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub code: Option<String>,
}

fn map_tool_call(call: WireToolCall) -> ApiToolCall {
    ApiToolCall {
        id: call.id,
        kind: function_kind(),
        function: ApiFunctionCall {
            name: call.function.name.to_string(),
            arguments: call.function.arguments,
        },
    }
}

fn map_message(message: Message) -> ApiMessage {
    let tool_calls: Option<Vec<ApiToolCall>> = if message.tool_calls.is_empty() {
        None
    } else {
        Some(message.tool_calls.into_iter().map(map_tool_call).collect())
    };
    // Only an assistant turn that calls tools may go without text.
    let content = if message.content.is_empty() && tool_calls.is_some() {
        None
    } else {
        Some(message.content)
    };
    ApiMessage {
        role: message.role,
        content,
        name: message.name,
        tool_call_id: message.tool_call_id,
        tool_calls,
    }
}

fn map_tool_spec(spec: ToolSpec) -> ApiTool {
    ApiTool {
        kind: function_kind(),
        function: ApiFunction {
            name: spec.name.to_string(),
            description: spec.description,
            parameters: spec.parameters,
        },
    }
}

impl From<ChatRequest> for ChatCompletionRequest {
    fn from(request: ChatRequest) -> Self {
        let tools = if request.tools.is_empty() {
            None
        } else {
            Some(request.tools.into_iter().map(map_tool_spec).collect())
        };
        Self {
            model: request.model,
            messages: request.messages.into_iter().map(map_message).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            top_p: request.top_p,
            tools,
            tool_choice: request.tool_choice,
            seed: request.seed,
            stream: false,
        }
    }
}

impl From<ChatCompletionResponse> for ChatCompletion {
    fn from(response: ChatCompletionResponse) -> Self {
        let choices = response
            .choices
            .into_iter()
            .map(|choice| ChatChoice {
                content: choice.message.content,
                tool_calls: choice
                    .message
                    .tool_calls
                    .unwrap_or_default()
                    .into_iter()
                    .map(|call| RawToolCall {
                        id: call.id,
                        name: call.function.name,
                        arguments: call.function.arguments,
                    })
                    .collect(),
            })
            .collect();
        ChatCompletion { choices }
    }
}

#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    http: Client,
    base_url: String,
    api_key: Option<SecretString>,
    timeout: Duration,
}

impl fmt::Debug for OpenAiCompatibleClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiCompatibleClient")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.api_key.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OpenAiCompatibleClient {
    pub fn builder() -> OpenAiCompatibleBuilder {
        OpenAiCompatibleBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn transport_error(&self, err: reqwest::Error) -> GitgptError {
        if err.is_timeout() {
            GitgptError::Timeout(self.timeout)
        } else {
            GitgptError::BackendUnavailable(err.to_string())
        }
    }
}

#[async_trait::async_trait]
impl ChatBackend for OpenAiCompatibleClient {
    async fn chat_complete(&self, request: ChatRequest) -> Result<ChatCompletion, GitgptError> {
        let body = ChatCompletionRequest::from(request);
        debug!(
            model = %body.model,
            messages = body.messages.len(),
            tools = body.tools.as_ref().map_or(0, Vec::len),
            tool_choice = ?body.tool_choice,
            "sending chat completion"
        );

        let mut builder = self.http.post(self.completions_url()).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GitgptError::BackendStatus {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|err| self.transport_error(err))?;
        // A 200 with an unreadable body will not improve on retry.
        let response: ChatCompletionResponse = serde_json::from_str(&body)?;
        if let Some(usage) = &response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "chat completion received"
            );
        }
        Ok(response.into())
    }
}

#[derive(Default)]
pub struct OpenAiCompatibleBuilder {
    base_url: Option<Url>,
    api_key: Option<SecretString>,
    timeout: Option<Duration>,
}

impl OpenAiCompatibleBuilder {
    pub fn base_url(mut self, url: &str) -> Result<Self, GitgptError> {
        let url = Url::parse(url)
            .map_err(|err| GitgptError::InvalidConfig(format!("invalid base url '{url}': {err}")))?;
        self.base_url = Some(url);
        Ok(self)
    }

    pub fn api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<OpenAiCompatibleClient, GitgptError> {
        let base_url = self
            .base_url
            .ok_or_else(|| GitgptError::InvalidConfig("base url is required".to_string()))?;
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| GitgptError::InvalidConfig(err.to_string()))?;
        Ok(OpenAiCompatibleClient {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            api_key: self.api_key,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitgpt_core::{ToolName, WireFunction};

    #[test]
    fn assistant_tool_turn_is_sent_without_text() {
        let mut message = Message::assistant("");
        message.tool_calls = vec![WireToolCall {
            id: "call_1".to_string(),
            function: WireFunction {
                name: ToolName::ExecuteCommand,
                arguments: "{\"command\":\"git status\"}".to_string(),
            },
        }];

        let value = serde_json::to_value(map_message(message)).unwrap();
        assert!(value["content"].is_null());
        assert_eq!(value["tool_calls"][0]["type"], "function");
        assert_eq!(value["tool_calls"][0]["function"]["name"], "execute_command");
    }

    #[test]
    fn tool_reply_keeps_call_id() {
        let value = serde_json::to_value(map_message(Message::tool("call_1", "clean"))).unwrap();
        assert_eq!(value["role"], "tool");
        assert_eq!(value["content"], "clean");
        assert_eq!(value["tool_call_id"], "call_1");
        assert!(value.get("tool_calls").is_none());
    }

    #[test]
    fn empty_assistant_turn_without_tools_keeps_text_field() {
        let value = serde_json::to_value(map_message(Message::assistant(""))).unwrap();
        assert_eq!(value["role"], "assistant");
        assert_eq!(value["content"], "");
        assert!(value.get("tool_calls").is_none());
    }

    #[test]
    fn builder_rejects_bad_url() {
        assert!(OpenAiCompatibleClient::builder().base_url("not a url").is_err());
    }

    #[test]
    fn builder_requires_base_url() {
        assert!(OpenAiCompatibleClient::builder().build().is_err());
    }

    #[test]
    fn debug_output_hides_api_key() {
        let client = OpenAiCompatibleClient::builder()
            .base_url("https://api.groq.com/openai/v1")
            .unwrap()
            .api_key(SecretString::new("gsk_secret".to_string()))
            .build()
            .unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("gsk_secret"));
        assert!(debug.contains("has_api_key: true"));
    }
}
