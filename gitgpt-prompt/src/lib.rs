//! Static prompt text and tool schemas shared by every request.
mod catalog;
mod template;

pub use catalog::{security_prompt, system_prompt, task_conversation, tool_catalog, TASK_TEMPLATE};
pub use template::PromptTemplate;
