//! Provider catalog served by `GET /v0/admin/providers/catalog`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One provider the backend knows about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminProviderCatalogItem {
    /// Provider id, e.g. `gemini-cli`.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub id: String,
    /// Display label.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub label: String,
    /// Grouping, e.g. `oauth`.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub category: String,
    /// Whether the provider exposes a model list.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub supports_models: bool,
}

/// Catalog response envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminProviderCatalogResponse {
    /// Providers in backend order.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub providers: Vec<AdminProviderCatalogItem>,
}

/// `<option>` of the provider dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDropdownOption {
    /// Option label.
    pub label: String,
    /// Option value, the normalized provider id.
    pub value: String,
}

/// Map catalog items to dropdown options, keeping backend order.
///
/// Ids are trimmed and lowercased; blank and repeated ids are skipped. An empty
/// label falls back to the id before `translate` runs.
pub fn to_provider_dropdown_options<F>(
    items: &[AdminProviderCatalogItem],
    translate: F,
) -> Vec<ProviderDropdownOption>
where
    F: Fn(&str) -> String,
{
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(items.len());

    for item in items {
        let id = item.id.trim().to_lowercase();
        if id.is_empty() || !seen.insert(id.clone()) {
            continue;
        }

        let raw_label = match item.label.trim() {
            "" => id.as_str(),
            label => label,
        };
        out.push(ProviderDropdownOption {
            label: translate(raw_label),
            value: id,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, label: &str) -> AdminProviderCatalogItem {
        AdminProviderCatalogItem {
            id: id.to_string(),
            label: label.to_string(),
            category: "oauth".to_string(),
            supports_models: true,
        }
    }

    fn as_is(label: &str) -> String {
        label.to_string()
    }

    #[test]
    fn keeps_backend_order() {
        let out = to_provider_dropdown_options(
            &[item("gemini-cli", "Gemini CLI"), item("kiro", "Kiro"), item("qwen", "Qwen")],
            as_is,
        );
        let values: Vec<_> = out.iter().map(|o| o.value.as_str()).collect();
        let labels: Vec<_> = out.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(values, ["gemini-cli", "kiro", "qwen"]);
        assert_eq!(labels, ["Gemini CLI", "Kiro", "Qwen"]);
    }

    #[test]
    fn drops_blank_and_duplicate_ids() {
        let out = to_provider_dropdown_options(
            &[item("", "Empty"), item("kiro", "Kiro"), item("Kiro", "Kiro Duplicate")],
            as_is,
        );
        assert_eq!(out, vec![ProviderDropdownOption {
            label: "Kiro".to_string(),
            value: "kiro".to_string(),
        }]);
    }

    #[test]
    fn label_falls_back_to_id() {
        let out = to_provider_dropdown_options(&[item(" kilo ", "")], as_is);
        assert_eq!(out[0].label, "kilo");
        assert_eq!(out[0].value, "kilo");
    }

    #[test]
    fn translate_sees_raw_label() {
        let out = to_provider_dropdown_options(&[item("codex", "Codex")], |label| format!("[{label}]"));
        assert_eq!(out[0].label, "[Codex]");
    }

    #[test]
    fn parses_catalog_envelope() {
        let raw = r#"{"providers":[{"id":"codex","label":"Codex","category":"oauth","supports_models":true}]}"#;
        let catalog: AdminProviderCatalogResponse = serde_json::from_str(raw).expect("catalog");
        assert_eq!(catalog.providers[0], item("codex", "Codex"));
    }

    #[test]
    fn null_label_falls_back_to_id() {
        let raw = r#"{"providers":[
            {"id":"codex","label":null,"category":null,"supports_models":null},
            {"id":null,"label":"Nameless"}
        ]}"#;
        let catalog: AdminProviderCatalogResponse = serde_json::from_str(raw).expect("catalog with nulls");
        let out = to_provider_dropdown_options(&catalog.providers, as_is);
        assert_eq!(out, vec![ProviderDropdownOption {
            label: "codex".to_string(),
            value: "codex".to_string(),
        }]);

        let empty: AdminProviderCatalogResponse =
            serde_json::from_str(r#"{"providers":null}"#).expect("null list");
        assert!(empty.providers.is_empty());
    }
}
