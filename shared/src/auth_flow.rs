//! OAuth / device-code sign-in flow for auth files.
//!
//! `POST /v0/admin/tokens/{provider}` starts a flow and hands back a `state`;
//! the panel then polls `GET /v0/admin/tokens/get-auth-status?state=` until
//! the backend reports `ok` or `error`. Both responses are validated here
//! because the backend occasionally returns partial objects.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Delay between two status polls.
pub const AUTH_POLL_INTERVAL_MS: u32 = 2_000;

/// Message shown when the backend fails a flow without saying why.
pub const DEFAULT_AUTH_FAILURE: &str = "Authentication failed";

/// Rejections of the start and status responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResponseShapeError {
    /// Start response is not an object.
    #[error("Invalid token response")]
    InvalidTokenResponse,
    /// Start response has no usable `state`.
    #[error("Token response missing state")]
    MissingState,
    /// Status response is not an object or carries an unknown status.
    #[error("Invalid auth status response")]
    InvalidAuthStatus,
}

/// Validated start response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStartResponse {
    /// Flow handle used for polling.
    pub state: String,
    /// Browser sign-in URL.
    pub url: Option<String>,
    /// Flow flavour reported by the backend.
    pub method: Option<String>,
    /// Device-code verification page.
    pub verification_url: Option<String>,
    /// Same page under its RFC 8628 name.
    pub verification_uri: Option<String>,
    /// Device code to type on the verification page.
    pub user_code: Option<String>,
}

/// Status values reported while polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    /// Credential stored.
    Ok,
    /// Still waiting on the user.
    Wait,
    /// Flow failed.
    Error,
    /// Device-code data available.
    DeviceCode,
    /// Sign-in URL available.
    AuthUrl,
}

impl AuthStatus {
    /// Wire value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Wait => "wait",
            Self::Error => "error",
            Self::DeviceCode => "device_code",
            Self::AuthUrl => "auth_url",
        }
    }

    /// Whether polling stops on this status.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ok | Self::Error)
    }
}

impl fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthStatus {
    type Err = ResponseShapeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "ok" => Ok(Self::Ok),
            "wait" => Ok(Self::Wait),
            "error" => Ok(Self::Error),
            "device_code" => Ok(Self::DeviceCode),
            "auth_url" => Ok(Self::AuthUrl),
            _ => Err(ResponseShapeError::InvalidAuthStatus),
        }
    }
}

/// Validated status response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStatusResponse {
    /// Flow status.
    pub status: AuthStatus,
    /// Failure reason for [`AuthStatus::Error`].
    pub error: Option<String>,
    /// Device-code verification page.
    pub verification_url: Option<String>,
    /// Device code.
    pub user_code: Option<String>,
    /// Sign-in URL.
    pub url: Option<String>,
}

fn trimmed_field(raw: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn normalize_optional_text(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

/// Validate the start response.
///
/// Strings are trimmed and blanks become `None`. `verification_url` and
/// `verification_uri` fill in for each other.
pub fn normalize_token_start_response(input: &Value) -> Result<TokenStartResponse, ResponseShapeError> {
    let raw = input.as_object().ok_or(ResponseShapeError::InvalidTokenResponse)?;
    let state = trimmed_field(raw, "state").ok_or(ResponseShapeError::MissingState)?;

    let verification_url = trimmed_field(raw, "verification_url");
    let verification_uri = trimmed_field(raw, "verification_uri");

    Ok(TokenStartResponse {
        state,
        url: trimmed_field(raw, "url"),
        method: trimmed_field(raw, "method"),
        verification_url: verification_url.clone().or_else(|| verification_uri.clone()),
        verification_uri: verification_uri.or(verification_url),
        user_code: trimmed_field(raw, "user_code"),
    })
}

/// Validate one status poll.
pub fn normalize_auth_status_response(input: &Value) -> Result<AuthStatusResponse, ResponseShapeError> {
    let raw = input.as_object().ok_or(ResponseShapeError::InvalidAuthStatus)?;
    let status = trimmed_field(raw, "status")
        .ok_or(ResponseShapeError::InvalidAuthStatus)?
        .parse::<AuthStatus>()?;

    Ok(AuthStatusResponse {
        status,
        error: trimmed_field(raw, "error"),
        verification_url: trimmed_field(raw, "verification_url"),
        user_code: trimmed_field(raw, "user_code"),
        url: trimmed_field(raw, "url"),
    })
}

/// Prefer a non-blank incoming value, else keep the current one.
pub fn merge_device_code_field(current: Option<&str>, incoming: Option<&str>) -> Option<String> {
    normalize_optional_text(incoming)
        .or_else(|| normalize_optional_text(current))
        .map(str::to_string)
}

/// Whether there is anything device-code related to show.
pub fn has_device_code_data(verification_url: Option<&str>, user_code: Option<&str>) -> bool {
    normalize_optional_text(verification_url).is_some() || normalize_optional_text(user_code).is_some()
}

/// Where a running flow stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthFlowPhase {
    /// Nothing started.
    #[default]
    Idle,
    /// Waiting for the user; keep polling.
    Polling,
    /// Credential stored.
    Completed,
    /// Flow failed with this message.
    Failed(String),
}

/// Everything the sign-in panel renders for one flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthFlowProgress {
    /// Flow handle from the start response.
    pub state: String,
    /// Provider the flow was started for.
    pub provider: String,
    /// Browser sign-in URL.
    pub auth_url: Option<String>,
    /// Device-code verification page.
    pub verification_url: Option<String>,
    /// Device code.
    pub user_code: Option<String>,
    /// Current phase.
    pub phase: AuthFlowPhase,
}

impl AuthFlowProgress {
    /// Progress right after a successful start.
    pub fn started(provider: impl Into<String>, start: TokenStartResponse) -> Self {
        Self {
            state: start.state,
            provider: provider.into(),
            auth_url: start.url,
            verification_url: start.verification_url.or(start.verification_uri),
            user_code: start.user_code,
            phase: AuthFlowPhase::Polling,
        }
    }

    /// Fold one poll into the progress.
    ///
    /// Device-code fields survive polls that omit them.
    pub fn apply_status(&mut self, status: &AuthStatusResponse) {
        self.verification_url =
            merge_device_code_field(self.verification_url.as_deref(), status.verification_url.as_deref());
        self.user_code = merge_device_code_field(self.user_code.as_deref(), status.user_code.as_deref());
        self.auth_url = merge_device_code_field(self.auth_url.as_deref(), status.url.as_deref());

        self.phase = match status.status {
            AuthStatus::Ok => AuthFlowPhase::Completed,
            AuthStatus::Error => AuthFlowPhase::Failed(
                status
                    .error
                    .clone()
                    .unwrap_or_else(|| DEFAULT_AUTH_FAILURE.to_string()),
            ),
            AuthStatus::Wait | AuthStatus::DeviceCode | AuthStatus::AuthUrl => AuthFlowPhase::Polling,
        };
    }

    /// Whether another poll should be scheduled.
    pub fn should_poll(&self) -> bool {
        self.phase == AuthFlowPhase::Polling
    }

    /// Whether the device-code block should be shown.
    pub fn has_device_code(&self) -> bool {
        has_device_code_data(self.verification_url.as_deref(), self.user_code.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn start_response_mirrors_verification_fields() {
        let from_url = normalize_token_start_response(&json!({
            "state": " s-1 ",
            "verification_url": "https://example.com/device",
            "user_code": "ABCD-1234",
            "method": ""
        }))
        .expect("valid");
        assert_eq!(from_url.state, "s-1");
        assert_eq!(from_url.verification_uri.as_deref(), Some("https://example.com/device"));
        assert_eq!(from_url.method, None);

        let from_uri = normalize_token_start_response(&json!({
            "state": "s-2",
            "verification_uri": "https://example.com/activate"
        }))
        .expect("valid");
        assert_eq!(from_uri.verification_url.as_deref(), Some("https://example.com/activate"));
    }

    #[test]
    fn start_response_rejections() {
        assert_eq!(
            normalize_token_start_response(&json!("nope")),
            Err(ResponseShapeError::InvalidTokenResponse)
        );
        assert_eq!(
            normalize_token_start_response(&json!({"state": "  "})),
            Err(ResponseShapeError::MissingState)
        );
        assert_eq!(ResponseShapeError::MissingState.to_string(), "Token response missing state");
    }

    #[test]
    fn status_response_validation() {
        let status = normalize_auth_status_response(&json!({
            "status": "device_code",
            "verification_url": "https://example.com/device",
            "user_code": " CODE "
        }))
        .expect("valid");
        assert_eq!(status.status, AuthStatus::DeviceCode);
        assert_eq!(status.user_code.as_deref(), Some("CODE"));

        for bad in [json!(null), json!({}), json!({"status": "done"})] {
            assert_eq!(
                normalize_auth_status_response(&bad),
                Err(ResponseShapeError::InvalidAuthStatus)
            );
        }
    }

    #[test]
    fn merge_prefers_incoming_non_blank() {
        assert_eq!(merge_device_code_field(Some("old"), Some("new")).as_deref(), Some("new"));
        assert_eq!(merge_device_code_field(Some("old"), Some("  ")).as_deref(), Some("old"));
        assert_eq!(merge_device_code_field(Some("old"), None).as_deref(), Some("old"));
        assert_eq!(merge_device_code_field(None, None), None);
        assert!(has_device_code_data(None, Some("X")));
        assert!(!has_device_code_data(Some(" "), None));
    }

    #[test]
    fn device_code_survives_wait_polls() {
        let start = normalize_token_start_response(&json!({
            "state": "s",
            "verification_uri": "https://example.com/device",
            "user_code": "ABCD"
        }))
        .expect("valid");
        let mut progress = AuthFlowProgress::started("kiro", start);
        assert!(progress.should_poll());

        let wait = normalize_auth_status_response(&json!({"status": "wait"})).expect("valid");
        progress.apply_status(&wait);

        assert!(progress.should_poll());
        assert!(progress.has_device_code());
        assert_eq!(progress.user_code.as_deref(), Some("ABCD"));
        assert_eq!(progress.verification_url.as_deref(), Some("https://example.com/device"));
    }

    #[test]
    fn terminal_statuses() {
        let mut progress = AuthFlowProgress::default();
        progress.apply_status(&normalize_auth_status_response(&json!({"status": "ok"})).expect("ok"));
        assert_eq!(progress.phase, AuthFlowPhase::Completed);
        assert!(!progress.should_poll());

        progress.apply_status(&normalize_auth_status_response(&json!({"status": "error"})).expect("err"));
        assert_eq!(progress.phase, AuthFlowPhase::Failed(DEFAULT_AUTH_FAILURE.to_string()));

        progress.apply_status(
            &normalize_auth_status_response(&json!({"status": "error", "error": "denied"})).expect("err"),
        );
        assert_eq!(progress.phase, AuthFlowPhase::Failed("denied".to_string()));
        assert!(AuthStatus::Ok.is_terminal());
        assert!(!AuthStatus::AuthUrl.is_terminal());
    }
}
