use std::collections::HashMap;

use gitgpt_core::{GitgptError, Message, ToolName, ToolSpec, Value};
use serde_json::json;

use crate::PromptTemplate;

const SYSTEM_PROMPT: &str = r#"## Git command assistant

Understand what the user wants, turn the request into Git commands and carry
them out.

### Functions

You interact through two functions:
1. execute_command(): runs a command in the user's terminal; you receive its output.
2. ask_user(): asks the user directly; you receive the user's answer.

### Rules

1. When the next step depends on the output of the previous command, wait for
   that output before generating the next command.
2. Every command to run must be inside a single execute_command() call.
3. When you need more detail or a confirmation, use ask_user(), preferably as
   a question with options.

### Examples

```
execute_command("git status")
```

```
execute_command("git switch -c feature/api")
```

To ask the user for more detail:

```
ask_user("Discard the changes in this file? (cannot be undone)", ["Y", "N"])
```

```
ask_user("Which operation?", ["1. merge", "2. rebase", "3. resolve conflicts", "4. other (describe)"])
```

Prefer questions with options (Y/N, 1234); only ask for free text when the
exact answer is required.

### Guidelines

- Gather information with execute_command() whenever possible instead of
  asking the user for it.
- Only use ask_user() when there is not enough information to produce a
  command, and keep the number of interactions minimal.
- Think through the request step by step and write out your reasoning.
- Avoid interactive commands such as `git rebase -i`.

### Notes

- Your first command should be `execute_command("git status")`.
- The working directory already is the user's Git repository; do not change
  directories.
- Do only what the user asked. For example, a merge does not include pushing
  to the remote.
"#;

const SECURITY_PROMPT: &str = r#"Decide whether this command performs an irreversible operation, for example rm, git reset --hard, git push --force.
Answer Y if it is risky, N if it is not."#;

/// Wraps the user's task the way a new session starts.
pub const TASK_TEMPLATE: &str = "```### Task\nAnalyze the following user request:\n{{task}}```";

pub fn system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

pub fn security_prompt() -> &'static str {
    SECURITY_PROMPT
}

/// The two callable tools, `ask_user` first.
pub fn tool_catalog() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: ToolName::AskUser,
            description: "Interact with the user to learn what they need".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "message": {
                        "type": "string",
                        "description": "The question to ask"
                    },
                    "options": {
                        "type": "array",
                        "description": "Answer options, e.g. ['Y', 'N']; empty for a free-text answer",
                        "items": {"type": "string"}
                    }
                },
                "required": ["message"]
            }),
        },
        ToolSpec {
            name: ToolName::ExecuteCommand,
            description: "Execute a shell command".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "command": {
                        "type": "string",
                        "description": "The command to execute"
                    }
                },
                "required": ["command"]
            }),
        },
    ]
}

/// `[system prompt, wrapped task]`, the opening of a fresh session.
pub fn task_conversation(task: &str) -> Result<Vec<Message>, GitgptError> {
    let mut vars = HashMap::new();
    vars.insert("task".to_string(), Value::from(task));
    let wrapped = PromptTemplate::new(TASK_TEMPLATE).render(&vars)?;
    Ok(vec![Message::system(SYSTEM_PROMPT), Message::user(wrapped)])
}
