use gitgpt_core::{GitgptError, Message};
use gitgpt_llm::CompletionAdapter;
use gitgpt_prompt::security_prompt;
use tracing::debug;

/// Sampling temperature for classifier calls.
pub const CLASSIFIER_TEMPERATURE: f32 = 1.0;

/// Asks a small model whether a shell command is irreversible.
#[derive(Clone)]
pub struct SafetyClassifier {
    adapter: CompletionAdapter,
    model: String,
    force_tools: bool,
}

impl SafetyClassifier {
    pub fn new(adapter: CompletionAdapter, model: impl Into<String>, force_tools: bool) -> Self {
        Self {
            adapter,
            model: model.into(),
            force_tools,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns `true` when the model flags `command` as destructive.
    pub async fn is_destructive(&self, command: &str) -> Result<bool, GitgptError> {
        let messages = vec![
            Message::system(security_prompt()),
            Message::user(command),
        ];
        let result = self
            .adapter
            .complete(&self.model, messages, CLASSIFIER_TEMPERATURE, self.force_tools)
            .await?;

        let text = result.text.unwrap_or_default();
        let destructive = verdict_is_destructive(&text);
        debug!(model = %self.model, verdict = %text, destructive, "classified command");
        Ok(destructive)
    }
}

/// A reply counts as destructive only if it says `Y` and never says `N`.
/// Ambiguous or empty replies are treated as not destructive.
pub fn verdict_is_destructive(text: &str) -> bool {
    text.contains('Y') && !text.contains('N')
}
