use crate::{Message, Role, ToolName};

/// Where a multi-turn session stands, derived from the history alone.
///
/// The gateway keeps no session memory; this is recomputed from whatever the
/// client resends and is only ever observed, never enforced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConversationState {
    AwaitingCommand,
    AwaitingExecutionResult { call_id: String },
    AwaitingUserReply { call_id: String },
}

impl ConversationState {
    pub fn from_history(messages: &[Message]) -> Self {
        let Some(turn) = messages
            .iter()
            .rposition(|m| m.role == Role::Assistant && !m.tool_calls.is_empty())
        else {
            return ConversationState::AwaitingCommand;
        };

        let replies = &messages[turn + 1..];
        // A user turn after the tool calls answers all of them.
        if replies.iter().any(|m| m.role == Role::User) {
            return ConversationState::AwaitingCommand;
        }

        let answered = |id: &str| {
            replies
                .iter()
                .any(|m| m.role == Role::Tool && m.tool_call_id.as_deref() == Some(id))
        };

        messages[turn]
            .tool_calls
            .iter()
            .find(|call| !answered(&call.id))
            .map(|call| match call.function.name {
                ToolName::ExecuteCommand => ConversationState::AwaitingExecutionResult {
                    call_id: call.id.clone(),
                },
                ToolName::AskUser => ConversationState::AwaitingUserReply {
                    call_id: call.id.clone(),
                },
            })
            .unwrap_or(ConversationState::AwaitingCommand)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConversationState::AwaitingCommand => "awaiting_command",
            ConversationState::AwaitingExecutionResult { .. } => "awaiting_execution_result",
            ConversationState::AwaitingUserReply { .. } => "awaiting_user_reply",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{WireFunction, WireToolCall};

    fn assistant_calling(calls: &[(&str, ToolName)]) -> Message {
        let mut message = Message::assistant("");
        message.tool_calls = calls
            .iter()
            .map(|(id, name)| WireToolCall {
                id: id.to_string(),
                function: WireFunction {
                    name: *name,
                    arguments: "{}".to_string(),
                },
            })
            .collect();
        message
    }

    #[test]
    fn empty_history_awaits_command() {
        assert_eq!(
            ConversationState::from_history(&[]),
            ConversationState::AwaitingCommand
        );
    }

    #[test]
    fn unanswered_execute_awaits_result() {
        let history = vec![
            Message::user("show me uncommitted changes"),
            assistant_calling(&[("call_1", ToolName::ExecuteCommand)]),
        ];
        assert_eq!(
            ConversationState::from_history(&history),
            ConversationState::AwaitingExecutionResult {
                call_id: "call_1".to_string()
            }
        );
    }

    #[test]
    fn tool_reply_returns_to_awaiting_command() {
        let history = vec![
            Message::user("show me uncommitted changes"),
            assistant_calling(&[("call_1", ToolName::ExecuteCommand)]),
            Message::tool("call_1", "nothing to commit"),
        ];
        assert_eq!(
            ConversationState::from_history(&history),
            ConversationState::AwaitingCommand
        );
    }

    #[test]
    fn first_unanswered_call_wins() {
        let history = vec![
            assistant_calling(&[
                ("call_1", ToolName::ExecuteCommand),
                ("call_2", ToolName::AskUser),
            ]),
            Message::tool("call_1", "ok"),
        ];
        assert_eq!(
            ConversationState::from_history(&history),
            ConversationState::AwaitingUserReply {
                call_id: "call_2".to_string()
            }
        );
    }

    #[test]
    fn user_turn_answers_ask_user() {
        let history = vec![
            assistant_calling(&[("call_9", ToolName::AskUser)]),
            Message::user("Y"),
        ];
        assert_eq!(
            ConversationState::from_history(&history).label(),
            "awaiting_command"
        );
    }
}
