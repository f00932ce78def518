use std::collections::HashMap;
use std::sync::OnceLock;

use gitgpt_core::{GitgptError, Value};
use regex::{Captures, Regex};

static PLACEHOLDER: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn placeholder() -> Result<&'static Regex, GitgptError> {
    PLACEHOLDER
        .get_or_init(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}"))
        .as_ref()
        .map_err(|err| GitgptError::InvalidConfig(format!("placeholder pattern: {err}")))
}

/// Strings are inserted bare; other JSON values use their JSON text.
fn substitute(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Prompt text with `{{name}}` slots. Unknown names render as nothing.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    source: String,
}

impl PromptTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn render(&self, vars: &HashMap<String, Value>) -> Result<String, GitgptError> {
        let rendered = placeholder()?
            .replace_all(&self.source, |caps: &Captures| substitute(vars.get(&caps[1])));
        Ok(rendered.into_owned())
    }
}
