mod conversation;
mod error;
mod llm;
mod retry;

pub use conversation::ConversationState;
pub use error::GitgptError;
pub use llm::{
    ChatBackend, ChatChoice, ChatCompletion, ChatRequest, CompletionResult, Message,
    RawToolCall, Role, ToolCall, ToolChoice, ToolName, ToolSpec, WireFunction, WireToolCall,
};
pub use retry::Retrying;

pub type Value = serde_json::Value;
