//! Shared HTTP helpers for the gateway.

use serde_json::Value;

/// Pulls GitHub's `message` field out of an error body, falling back to the
/// raw body text when it is not JSON or has no message.
pub(super) fn error_message(body: &str) -> String {
    extract_github_message(body).unwrap_or_else(|| body.trim().to_owned())
}

pub(super) fn extract_github_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return None;
    };
    value
        .get("message")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}
