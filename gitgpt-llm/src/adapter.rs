use std::sync::Arc;

use gitgpt_core::{
    ChatBackend, ChatChoice, ChatRequest, CompletionResult, GitgptError, Message, ToolCall,
    ToolChoice, ToolName, ToolSpec,
};
use tracing::{debug, warn};

/// Output token budget for every completion.
pub const MAX_COMPLETION_TOKENS: u32 = 1024;
/// Nucleus sampling left at its neutral value.
pub const TOP_P: f32 = 1.0;
/// Fixed seed so a model/prompt/temperature triple repeats where the backend allows.
pub const SEED: u64 = 42;

/// Wraps one backend call and normalizes the reply into a [`CompletionResult`].
///
/// No retry happens here; wrap the backend in `Retrying` for that.
#[derive(Clone)]
pub struct CompletionAdapter {
    backend: Arc<dyn ChatBackend>,
    tools: Arc<[ToolSpec]>,
}

impl CompletionAdapter {
    pub fn new(backend: Arc<dyn ChatBackend>, tools: Vec<ToolSpec>) -> Self {
        Self {
            backend,
            tools: tools.into(),
        }
    }

    pub async fn complete(
        &self,
        model: &str,
        messages: Vec<Message>,
        temperature: f32,
        enable_tools: bool,
    ) -> Result<CompletionResult, GitgptError> {
        let (tools, tool_choice) = if enable_tools {
            (self.tools.to_vec(), ToolChoice::Auto)
        } else {
            (Vec::new(), ToolChoice::None)
        };

        let request = ChatRequest {
            model: model.to_string(),
            messages,
            temperature,
            max_tokens: MAX_COMPLETION_TOKENS,
            top_p: TOP_P,
            tools,
            tool_choice,
            seed: Some(SEED),
        };

        let completion = self.backend.chat_complete(request).await?;
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or(GitgptError::EmptyCompletion)?;

        let result = normalize(choice, enable_tools);
        debug!(
            model,
            has_text = result.text.is_some(),
            tool_calls = result.tool_calls.len(),
            "completion normalized"
        );
        Ok(result)
    }
}

fn normalize(choice: ChatChoice, enable_tools: bool) -> CompletionResult {
    if !enable_tools && !choice.tool_calls.is_empty() {
        warn!(
            count = choice.tool_calls.len(),
            "backend returned tool calls with tools disabled, dropping them"
        );
        return CompletionResult {
            text: choice.content,
            tool_calls: Vec::new(),
        };
    }

    let tool_calls = choice
        .tool_calls
        .into_iter()
        .filter_map(|call| match call.name.parse::<ToolName>() {
            Ok(function_name) => Some(ToolCall {
                id: call.id,
                function_name,
                arguments_raw: call.arguments,
            }),
            Err(err) => {
                warn!(id = %call.id, %err, "dropping tool call");
                None
            }
        })
        .collect();

    CompletionResult {
        text: choice.content,
        tool_calls,
    }
}
