//! Build version reported by `GET /v0/version`.

use serde::{Deserialize, Serialize};

/// Version payload; every field but `current_version` may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionInfo {
    /// Running build.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub current_version: String,
    /// Newest published release, empty when unknown.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub latest_version: String,
    /// Whether `latest_version` is newer than the running build.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub has_update: bool,
    /// Release page to open from the update button.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub release_url: String,
    /// Build commit.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub commit: String,
    /// Build date.
    #[serde(deserialize_with = "crate::wire::null_as_default")]
    pub build_date: String,
    /// Why the release check failed, if it did.
    pub check_error: Option<String>,
}

impl VersionInfo {
    /// Release page, if an update is available and a page is known.
    pub fn update_url(&self) -> Option<&str> {
        let url = self.release_url.trim();
        (self.has_update && !url.is_empty()).then_some(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_payload() {
        let info: VersionInfo =
            serde_json::from_str(r#"{"current_version":"1.2.0","has_update":false}"#).expect("version");
        assert_eq!(info.current_version, "1.2.0");
        assert_eq!(info.latest_version, "");
        assert_eq!(info.check_error, None);
        assert_eq!(info.update_url(), None);
    }

    #[test]
    fn update_url_requires_flag_and_url() {
        let mut info = VersionInfo {
            has_update: true,
            latest_version: "1.3.0".to_string(),
            ..VersionInfo::default()
        };
        assert_eq!(info.update_url(), None);

        info.release_url = "https://example.com/releases/1.3.0".to_string();
        assert_eq!(info.update_url(), Some("https://example.com/releases/1.3.0"));
    }
}
