use std::sync::Arc;
use std::time::Duration;

use gitgpt_core::GitgptError;
use gitgpt_llm::{CompletionAdapter, GroqClient, Message, ToolName};
use gitgpt_prompt::tool_catalog;
use httpmock::prelude::*;
use secrecy::SecretString;
use serde_json::json;

fn adapter(server: &MockServer) -> CompletionAdapter {
    let backend = GroqClient::with_options(
        SecretString::new("gsk_test".to_string()),
        &server.base_url(),
        Duration::from_secs(5),
    )
    .expect("client");
    CompletionAdapter::new(Arc::new(backend), tool_catalog())
}

#[tokio::test]
async fn advertises_catalog_with_auto_choice() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/chat/completions")
            .header("authorization", "Bearer gsk_test")
            .json_body_partial(
                json!({
                    "max_tokens": 1024,
                    "top_p": 1.0,
                    "seed": 42,
                    "tool_choice": "auto",
                    "tools": [
                        {"type": "function", "function": {"name": "ask_user"}},
                        {"type": "function", "function": {"name": "execute_command"}}
                    ]
                })
                .to_string(),
            );
        then.status(200).json_body(json!({
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "Let me check the working tree first.",
                    "tool_calls": [
                        {"id": "call_a", "type": "function", "function": {"name": "execute_command", "arguments": "{\"command\":\"git status\"}"}},
                        {"id": "call_b", "type": "function", "function": {"name": "ask_user", "arguments": "{\"message\":\"Continue?\",\"options\":[\"Y\",\"N\"]}"}}
                    ]
                },
                "finish_reason": "tool_calls"
            }]
        }));
    });

    let result = adapter(&server)
        .complete(
            "llama-3.3-70b-versatile",
            vec![Message::user("show me uncommitted changes")],
            1.0,
            true,
        )
        .await
        .expect("completion");

    mock.assert();
    assert_eq!(
        result.text.as_deref(),
        Some("Let me check the working tree first.")
    );
    assert_eq!(result.tool_calls.len(), 2);
    assert_eq!(result.tool_calls[0].id, "call_a");
    assert_eq!(result.tool_calls[0].function_name, ToolName::ExecuteCommand);
    assert_eq!(
        result.tool_calls[0].arguments_raw,
        "{\"command\":\"git status\"}"
    );
    assert_eq!(result.tool_calls[1].function_name, ToolName::AskUser);
}

#[tokio::test]
async fn disabled_tools_send_none_choice() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/chat/completions")
            .json_body_partial(json!({"tool_choice": "none", "temperature": 0.5}).to_string());
        then.status(200).json_body(json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "N"}, "finish_reason": "stop"}]
        }));
    });

    let result = adapter(&server)
        .complete("llama-3.1-8b-instant", vec![Message::user("git log")], 0.5, false)
        .await
        .expect("completion");

    mock.assert();
    assert_eq!(result.text.as_deref(), Some("N"));
    assert!(result.tool_calls.is_empty());
}

#[tokio::test]
async fn null_tool_calls_become_empty_sequence() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(200).json_body(json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hi!", "tool_calls": null}, "finish_reason": "stop"}]
        }));
    });

    let result = adapter(&server)
        .complete("llama-3.3-70b-versatile", vec![], 1.0, true)
        .await
        .expect("completion");

    assert_eq!(result.text.as_deref(), Some("Hi!"));
    assert!(result.tool_calls.is_empty());
}

#[tokio::test]
async fn zero_choices_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(200).json_body(json!({"choices": []}));
    });

    let err = adapter(&server)
        .complete("llama-3.3-70b-versatile", vec![], 1.0, true)
        .await
        .unwrap_err();

    assert!(matches!(err, GitgptError::EmptyCompletion));
}

#[tokio::test]
async fn backend_failure_propagates_without_retry() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(502).body("bad gateway");
    });

    let err = adapter(&server)
        .complete("llama-3.3-70b-versatile", vec![], 1.0, true)
        .await
        .unwrap_err();

    assert_eq!(mock.hits(), 1);
    assert!(matches!(err, GitgptError::BackendStatus { status: 502, .. }));
}
