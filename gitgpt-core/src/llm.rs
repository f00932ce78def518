use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{GitgptError, Value};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// One turn of the conversation the front end resends on every call.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Message {
    pub role: Role,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<WireToolCall>,
}

impl Message {
    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            name: None,
            tool_call_id: None,
            tool_calls: vec![],
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    pub fn tool(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(call_id.into()),
            ..Self::plain(Role::Tool, content)
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The closed set of functions the model may call.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    AskUser,
    ExecuteCommand,
}

impl ToolName {
    pub const ALL: [ToolName; 2] = [ToolName::AskUser, ToolName::ExecuteCommand];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::AskUser => "ask_user",
            ToolName::ExecuteCommand => "execute_command",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = GitgptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| GitgptError::UnknownTool(s.to_string()))
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ToolSpec {
    pub name: ToolName,
    pub description: String,
    pub parameters: Value,
}

/// A normalized tool invocation proposed by the model.
///
/// `arguments_raw` is the backend's serialized JSON string, kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolCall {
    pub id: String,
    pub function_name: ToolName,
    pub arguments_raw: String,
}

/// `{id, function: {name, arguments}}`, the shape clients see and send back.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct WireToolCall {
    pub id: String,
    pub function: WireFunction,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct WireFunction {
    pub name: ToolName,
    #[serde(default)]
    pub arguments: String,
}

impl From<ToolCall> for WireToolCall {
    fn from(call: ToolCall) -> Self {
        Self {
            id: call.id,
            function: WireFunction {
                name: call.function_name,
                arguments: call.arguments_raw,
            },
        }
    }
}

impl From<WireToolCall> for ToolCall {
    fn from(call: WireToolCall) -> Self {
        Self {
            id: call.id,
            function_name: call.function.name,
            arguments_raw: call.function.arguments,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    #[default]
    Auto,
    None,
}

/// Everything a backend needs for one chat completion.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolSpec>,
    pub tool_choice: ToolChoice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ChatCompletion {
    pub choices: Vec<ChatChoice>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ChatChoice {
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<RawToolCall>,
}

/// A tool call as the backend reported it, before the name is checked.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct RawToolCall {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompletionResult {
    pub text: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync + 'static {
    async fn chat_complete(&self, request: ChatRequest) -> Result<ChatCompletion, GitgptError>;
}

#[async_trait::async_trait]
impl<B> ChatBackend for std::sync::Arc<B>
where
    B: ChatBackend + ?Sized,
{
    async fn chat_complete(&self, request: ChatRequest) -> Result<ChatCompletion, GitgptError> {
        (**self).chat_complete(request).await
    }
}
