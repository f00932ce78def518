mod adapter;

// OpenAI-compatible client (always available)
pub mod openai_compatible;

// Provider-specific clients (feature-gated)
pub mod providers;

pub use adapter::{CompletionAdapter, MAX_COMPLETION_TOKENS, SEED, TOP_P};
pub use gitgpt_core::{
    ChatBackend, ChatCompletion, ChatRequest, CompletionResult, Message, Role, ToolCall,
    ToolChoice, ToolName, ToolSpec,
};

pub use openai_compatible::{
    ChatCompletionRequest, ChatCompletionResponse, OpenAiCompatibleBuilder, OpenAiCompatibleClient,
};

#[cfg(feature = "groq")]
pub use providers::groq::{GroqClient, GROQ_BASE_URL};
