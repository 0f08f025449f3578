//! Provider based auth-file import: supported providers, example templates,
//! JSON parsing and the allow-list sanitizer applied before upload.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// One imported credential entry, kept as free-form JSON.
pub type ImportEntry = Map<String, Value>;

/// Providers accepted by `POST /v0/admin/auth-files/import-by-provider`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderImportKey {
    /// OpenAI Codex.
    #[serde(rename = "codex")]
    Codex,
    /// Anthropic Claude.
    #[serde(rename = "anthropic")]
    Anthropic,
    /// Gemini CLI.
    #[serde(rename = "gemini-cli")]
    GeminiCli,
    /// Antigravity.
    #[serde(rename = "antigravity")]
    Antigravity,
    /// Qwen.
    #[serde(rename = "qwen")]
    Qwen,
    /// Kiro.
    #[serde(rename = "kiro")]
    Kiro,
    /// iFlow, cookie / api-key / oauth modes.
    #[serde(rename = "iflow-cookie")]
    IflowCookie,
}

impl ProviderImportKey {
    /// Every key, in selector order.
    pub const ALL: [ProviderImportKey; 7] = [
        Self::Codex,
        Self::Anthropic,
        Self::GeminiCli,
        Self::Antigravity,
        Self::Qwen,
        Self::Kiro,
        Self::IflowCookie,
    ];

    /// Wire value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Codex => "codex",
            Self::Anthropic => "anthropic",
            Self::GeminiCli => "gemini-cli",
            Self::Antigravity => "antigravity",
            Self::Qwen => "qwen",
            Self::Kiro => "kiro",
            Self::IflowCookie => "iflow-cookie",
        }
    }

    /// Selector label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Codex => "Codex",
            Self::Anthropic => "Anthropic",
            Self::GeminiCli => "Gemini CLI",
            Self::Antigravity => "Antigravity",
            Self::Qwen => "Qwen",
            Self::Kiro => "Kiro",
            Self::IflowCookie => "iFlow",
        }
    }

    /// Auth type the backend stores the entry under.
    pub const fn canonical_type(self) -> &'static str {
        match self {
            Self::Codex => "codex",
            Self::Anthropic => "claude",
            Self::GeminiCli => "gemini",
            Self::Antigravity => "antigravity",
            Self::Qwen => "qwen",
            Self::Kiro => "kiro",
            Self::IflowCookie => "iflow",
        }
    }

    /// Fields kept by [`sanitize_entry_for_provider`].
    pub const fn allowed_fields(self) -> &'static [&'static str] {
        // Every provider currently shares the common list.
        COMMON_ALLOWED_FIELDS
    }

    /// Example entry shown in the "Provider Example" tab.
    pub fn template(self) -> Value {
        match self {
            Self::Codex | Self::Anthropic | Self::Antigravity | Self::Qwen => json!({
                "access_token": "<access_token>",
                "email": "you@example.com",
                "refresh_token": "<refresh_token_optional>",
            }),
            Self::GeminiCli => json!({
                "access_token": "<access_token>",
                "token": {
                    "access_token": "<access_token_optional_alternative>",
                },
                "project_id": "<gcp_project_id>",
                "email": "you@example.com",
            }),
            Self::Kiro => json!({
                "access_token": "<access_token>",
                "refresh_token": "<refresh_token_optional>",
                "auth_method": "builder-id",
                "email": "you@example.com",
            }),
            Self::IflowCookie => json!({
                "_mode_a_api_key": {
                    "api_key": "<api_key>",
                },
                "_mode_b_cookie": {
                    "cookie": "BXAuth=<cookie>",
                    "email": "you@example.com",
                },
                "_mode_c_oauth": {
                    "refresh_token": "<refresh_token>",
                    "access_token": "<access_token_optional>",
                },
                "api_key": "<api_key>",
            }),
        }
    }

    /// [`template`](Self::template) pretty-printed.
    pub fn template_text(self) -> String {
        let template = self.template();
        serde_json::to_string_pretty(&template).unwrap_or_else(|_| template.to_string())
    }
}

impl fmt::Display for ProviderImportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderImportKey {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| format!("unsupported import provider `{raw}`"))
    }
}

/// Credential fields the backend understands.
pub const COMMON_ALLOWED_FIELDS: &[&str] = &[
    "email",
    "proxy_url",
    "prefix",
    "api_key",
    "access_token",
    "refresh_token",
    "id_token",
    "token",
    "cookie",
    "cookies",
    "bxauth",
    "base_url",
    "project_id",
    "organization_id",
    "profile_arn",
    "auth_method",
    "provider",
    "client_id",
    "client_secret",
    "expires_at",
    "expired",
    "expires_in",
    "timestamp",
    "last_refresh",
    "disable_cooling",
    "request_retry",
    "runtime_only",
    "name",
    "session_key",
];

/// Where the entries came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportSource {
    /// Uploaded `.json` files.
    File,
    /// Pasted text.
    Text,
}

/// Rejection reasons of [`parse_entries_from_json_text`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportParseError {
    /// Blank input.
    #[error("empty json content")]
    Empty,
    /// Not JSON at all.
    #[error("invalid json")]
    InvalidJson,
    /// An array holding something other than objects.
    #[error("json array must contain objects")]
    NonObjectItem,
    /// A scalar at the top level.
    #[error("json must be an object or array of objects")]
    WrongShape,
}

/// Parse pasted or uploaded JSON into entries.
///
/// Accepts one object or an array of objects.
pub fn parse_entries_from_json_text(input: &str) -> Result<Vec<ImportEntry>, ImportParseError> {
    let text = input.trim();
    if text.is_empty() {
        return Err(ImportParseError::Empty);
    }

    let parsed: Value = serde_json::from_str(text).map_err(|_| ImportParseError::InvalidJson)?;
    match parsed {
        Value::Object(entry) => Ok(vec![entry]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(entry) => Ok(entry),
                _ => Err(ImportParseError::NonObjectItem),
            })
            .collect(),
        _ => Err(ImportParseError::WrongShape),
    }
}

/// Pretty-print entries back into the text box, unwrapping a single entry.
pub fn format_entries_text(entries: &[ImportEntry]) -> String {
    let value = match entries {
        [single] => Value::Object(single.clone()),
        many => Value::Array(many.iter().cloned().map(Value::Object).collect()),
    };
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

fn is_meaningful_value(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

fn pick_field_value<'a>(entry: &'a ImportEntry, field: &str) -> Option<&'a Value> {
    if let Some(value) = entry.get(field) {
        return Some(value);
    }
    entry
        .get("metadata")
        .and_then(Value::as_object)
        .and_then(|metadata| metadata.get(field))
}

/// Keep only allow-listed, non-empty fields, reading from `metadata` when
/// the top level lacks a field.
pub fn sanitize_entry_for_provider(provider: ProviderImportKey, entry: &ImportEntry) -> ImportEntry {
    let mut sanitized = ImportEntry::new();
    for field in provider.allowed_fields() {
        match pick_field_value(entry, field) {
            Some(value) if is_meaningful_value(value) => {
                sanitized.insert((*field).to_string(), value.clone());
            },
            _ => {},
        }
    }
    sanitized
}

/// Body of `POST /v0/admin/auth-files/import-by-provider`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderImportPayload {
    /// Target provider.
    pub provider: ProviderImportKey,
    /// Origin of the entries.
    pub source: ImportSource,
    /// Auth groups to attach the entries to; empty means default.
    pub auth_group_id: Vec<i64>,
    /// Sanitized entries.
    pub entries: Vec<ImportEntry>,
}

/// Sanitize `entries` and wrap them into an upload payload.
pub fn build_provider_import_payload(
    provider: ProviderImportKey,
    source: ImportSource,
    auth_group_ids: Vec<i64>,
    entries: &[ImportEntry],
) -> ProviderImportPayload {
    ProviderImportPayload {
        provider,
        source,
        auth_group_id: auth_group_ids,
        entries: entries
            .iter()
            .map(|entry| sanitize_entry_for_provider(provider, entry))
            .collect(),
    }
}

/// One entry the backend refused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderImportFailure {
    /// Position in the submitted list.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub index: usize,
    /// Key the backend derived for the entry, if any.
    pub key: Option<String>,
    /// Reason.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub error: String,
}

impl ProviderImportFailure {
    /// One-line summary, `#index (key): error`.
    pub fn summary(&self) -> String {
        match self.key.as_deref().filter(|key| !key.is_empty()) {
            Some(key) => format!("#{} ({}): {}", self.index, key, self.error),
            None => format!("#{}: {}", self.index, self.error),
        }
    }
}

/// Response of the import endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderImportResponse {
    /// Number of entries stored.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub imported: usize,
    /// Entries that were rejected.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub failed: Vec<ProviderImportFailure>,
}

/// Auth group an import can be attached to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthGroup {
    /// Group id.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub id: i64,
    /// Display name.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub name: String,
    /// Whether new auth files land here by default.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub is_default: bool,
}

/// Group preselected when the import modal opens.
pub fn default_auth_group_id(groups: &[AuthGroup]) -> Option<i64> {
    groups.iter().find(|group| group.is_default).map(|group| group.id)
}

/// Only `.json` files are accepted, case-insensitively.
pub fn is_json_file_name(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(value: Value) -> ImportEntry {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn parses_object_and_array() {
        let one = parse_entries_from_json_text(r#"{"key":"a","access_token":"x"}"#).expect("object");
        assert_eq!(one.len(), 1);

        let many = parse_entries_from_json_text(
            r#"[{"key":"a","access_token":"x"},{"key":"b","access_token":"y"}]"#,
        )
        .expect("array");
        assert_eq!(many.len(), 2);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse_entries_from_json_text("  "), Err(ImportParseError::Empty));
        assert_eq!(parse_entries_from_json_text("{oops"), Err(ImportParseError::InvalidJson));
        assert_eq!(parse_entries_from_json_text("[1, {}]"), Err(ImportParseError::NonObjectItem));
        assert_eq!(parse_entries_from_json_text("42"), Err(ImportParseError::WrongShape));
        assert_eq!(ImportParseError::InvalidJson.to_string(), "invalid json");
    }

    #[test]
    fn payload_drops_unknown_fields() {
        let payload = build_provider_import_payload(
            ProviderImportKey::Anthropic,
            ImportSource::Text,
            vec![1],
            &[entry(json!({"access_token": "token-a", "email": "User@Example.com ", "type": "x", "key": "k"}))],
        );
        assert_eq!(payload.provider, ProviderImportKey::Anthropic);
        let first = &payload.entries[0];
        assert!(first.get("type").is_none());
        assert!(first.get("key").is_none());
        assert_eq!(first.get("access_token"), Some(&json!("token-a")));

        let wire = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(wire["provider"], json!("anthropic"));
        assert_eq!(wire["source"], json!("text"));
        assert_eq!(wire["auth_group_id"], json!([1]));
    }

    #[test]
    fn sanitizer_skips_empty_values_and_reads_metadata() {
        let sanitized = sanitize_entry_for_provider(
            ProviderImportKey::Kiro,
            &entry(json!({
                "access_token": "token-a",
                "refresh_token": "  ",
                "token": {},
                "noisy": true,
                "metadata": {"refresh_token": "nested", "profile_arn": "arn:1"}
            })),
        );
        assert_eq!(sanitized.get("access_token"), Some(&json!("token-a")));
        // top-level blank wins the lookup, so the nested value is not used
        assert!(sanitized.get("refresh_token").is_none());
        assert!(sanitized.get("token").is_none());
        assert!(sanitized.get("noisy").is_none());
        assert_eq!(sanitized.get("profile_arn"), Some(&json!("arn:1")));
    }

    #[test]
    fn iflow_modes() {
        let key = ProviderImportKey::IflowCookie;
        let api_key = sanitize_entry_for_provider(key, &entry(json!({"api_key": "api-key-only"})));
        assert_eq!(api_key.get("api_key"), Some(&json!("api-key-only")));

        let cookie = sanitize_entry_for_provider(
            key,
            &entry(json!({"cookie": "BXAuth=demo", "email": "demo@example.com"})),
        );
        assert_eq!(cookie.get("cookie"), Some(&json!("BXAuth=demo")));
        assert_eq!(cookie.get("email"), Some(&json!("demo@example.com")));

        let oauth = sanitize_entry_for_provider(key, &entry(json!({"refresh_token": "rt-1"})));
        assert_eq!(oauth.get("refresh_token"), Some(&json!("rt-1")));
    }

    #[test]
    fn keys_round_trip_through_wire_names() {
        for key in ProviderImportKey::ALL {
            assert_eq!(key.as_str().parse::<ProviderImportKey>(), Ok(key));
            assert!(key.template().is_object());
        }
        assert_eq!(ProviderImportKey::Anthropic.canonical_type(), "claude");
        assert!(" Gemini-CLI ".parse::<ProviderImportKey>().is_ok());
        assert!("vertex".parse::<ProviderImportKey>().is_err());
    }

    #[test]
    fn format_unwraps_single_entry() {
        let entries = parse_entries_from_json_text(r#"[{"a":1}]"#).expect("array");
        assert_eq!(format_entries_text(&entries), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn failure_summary_and_helpers() {
        let with_key = ProviderImportFailure {
            index: 2,
            key: Some("auth-a".to_string()),
            error: "duplicate".to_string(),
        };
        assert_eq!(with_key.summary(), "#2 (auth-a): duplicate");
        assert_eq!(
            ProviderImportFailure {
                index: 0,
                key: None,
                error: "bad".to_string(),
            }
            .summary(),
            "#0: bad"
        );

        let groups = vec![
            AuthGroup {
                id: 1,
                name: "a".to_string(),
                is_default: false,
            },
            AuthGroup {
                id: 7,
                name: "b".to_string(),
                is_default: true,
            },
        ];
        assert_eq!(default_auth_group_id(&groups), Some(7));
        assert!(is_json_file_name("Auth.JSON"));
        assert!(!is_json_file_name("auth.txt"));
    }

    #[test]
    fn responses_tolerate_null_fields() {
        let response: ProviderImportResponse = serde_json::from_str(
            r#"{"imported": null, "failed": [{"index": null, "key": null, "error": null}]}"#,
        )
        .expect("response with nulls");
        assert_eq!(response.imported, 0);
        assert_eq!(response.failed[0].summary(), "#0: ");

        let groups: Vec<AuthGroup> =
            serde_json::from_str(r#"[{"id": 3, "name": null, "is_default": null}]"#).expect("groups");
        assert_eq!(groups[0].name, "");
        assert_eq!(default_auth_group_id(&groups), None);
    }

    #[test]
    fn key_order_is_kept() {
        let template = ProviderImportKey::GeminiCli.template_text();
        let positions: Vec<_> = ["\"access_token\"", "\"token\"", "\"project_id\"", "\"email\""]
            .iter()
            .map(|key| template.find(key).expect("template key"))
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{template}");

        let entries = parse_entries_from_json_text(r#"{"zeta": 1, "alpha": 2}"#).expect("object");
        assert_eq!(format_entries_text(&entries), "{\n  \"zeta\": 1,\n  \"alpha\": 2\n}");
    }
}
