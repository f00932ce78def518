use std::error::Error;
use std::time::Duration;

use gitgpt_core::GitgptError;

#[test]
fn transient_classification() {
    assert!(GitgptError::BackendUnavailable("dns".to_string()).is_transient());
    assert!(GitgptError::Timeout(Duration::from_secs(60)).is_transient());
    assert!(GitgptError::BackendStatus {
        status: 503,
        message: "overloaded".to_string()
    }
    .is_transient());
    assert!(GitgptError::BackendStatus {
        status: 429,
        message: "slow down".to_string()
    }
    .is_transient());

    assert!(!GitgptError::BackendStatus {
        status: 400,
        message: "bad request".to_string()
    }
    .is_transient());
    assert!(!GitgptError::EmptyCompletion.is_transient());
    assert!(!GitgptError::UnknownTool("x".to_string()).is_transient());
}

#[test]
fn max_retries_exposes_last_error_as_source() {
    let err = GitgptError::MaxRetriesExceeded {
        max: 3,
        last: Box::new(GitgptError::Timeout(Duration::from_secs(5))),
    };
    assert_eq!(err.to_string(), "Max retries (3) exceeded: Operation timed out after 5s");
    assert!(err.source().is_some());
}

#[test]
fn serde_errors_convert() {
    let err: GitgptError = serde_json::from_str::<serde_json::Value>("{")
        .unwrap_err()
        .into();
    assert!(matches!(err, GitgptError::Serde(_)));
}
