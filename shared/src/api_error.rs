//! Error raised for non-success backend responses.

use serde_json::Value;
use thiserror::Error;

/// Error code the backend uses when a prepaid daily budget is spent.
pub const DAILY_MAX_USAGE_EXCEEDED: &str = "daily_max_usage_exceeded";

/// User-facing text for [`DAILY_MAX_USAGE_EXCEEDED`].
pub const DAILY_MAX_USAGE_MESSAGE: &str = "Daily max prepaid spend exceeded";

/// Non-2xx response, already resolved to a display message.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiRequestError {
    /// Resolved user-facing message.
    pub message: String,
    /// HTTP status.
    pub status: u16,
    /// Backend `code` field, if present.
    pub code: Option<String>,
    /// Parsed error body, `{}` when it was not JSON.
    pub payload: Value,
}

impl ApiRequestError {
    /// Build from the status and the (possibly empty) error body.
    pub fn from_response(status: u16, payload: Value) -> Self {
        let message = resolve_api_error_message(&payload, status);
        let code = payload
            .get("code")
            .and_then(Value::as_str)
            .map(str::to_string);
        Self {
            message,
            status,
            code,
            payload,
        }
    }
}

/// Pick the message for an error body.
///
/// Order: known `code`, then a non-blank `error` string, then a generic
/// status line.
pub fn resolve_api_error_message(payload: &Value, status: u16) -> String {
    if payload.get("code").and_then(Value::as_str) == Some(DAILY_MAX_USAGE_EXCEEDED) {
        return DAILY_MAX_USAGE_MESSAGE.to_string();
    }
    match payload.get("error").and_then(Value::as_str) {
        Some(error) if !error.trim().is_empty() => error.to_string(),
        _ => format!("Request failed with status {status}"),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn known_code_wins() {
        let payload = json!({"code": "daily_max_usage_exceeded", "error": "raw"});
        assert_eq!(resolve_api_error_message(&payload, 429), DAILY_MAX_USAGE_MESSAGE);
    }

    #[test]
    fn error_field_then_status() {
        assert_eq!(resolve_api_error_message(&json!({"error": "bad key"}), 400), "bad key");
        assert_eq!(
            resolve_api_error_message(&json!({"error": "  "}), 500),
            "Request failed with status 500"
        );
        assert_eq!(resolve_api_error_message(&json!({}), 502), "Request failed with status 502");
    }

    #[test]
    fn display_is_the_message() {
        let err = ApiRequestError::from_response(403, json!({"code": "forbidden", "error": "no access"}));
        assert_eq!(err.to_string(), "no access");
        assert_eq!(err.code.as_deref(), Some("forbidden"));
        assert_eq!(err.status, 403);
    }
}
