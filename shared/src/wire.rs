//! Serde helpers for backend payloads.

use serde::{Deserialize, Deserializer};

/// Read an explicit `null` as the field's default.
///
/// `#[serde(default)]` only covers missing keys; the backend also sends
/// `null` for columns it has no value for.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::null_as_default;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Row {
        #[serde(deserialize_with = "null_as_default")]
        name: String,
        #[serde(deserialize_with = "null_as_default")]
        count: u64,
    }

    #[test]
    fn null_missing_and_present_values() {
        let row: Row = serde_json::from_str(r#"{"name": null, "count": null}"#).expect("null row");
        assert_eq!((row.name.as_str(), row.count), ("", 0));

        let row: Row = serde_json::from_str("{}").expect("empty row");
        assert_eq!((row.name.as_str(), row.count), ("", 0));

        let row: Row = serde_json::from_str(r#"{"name": "a", "count": 3}"#).expect("full row");
        assert_eq!((row.name.as_str(), row.count), ("a", 3));
    }

    #[test]
    fn wrong_type_still_fails() {
        assert!(serde_json::from_str::<Row>(r#"{"count": "three"}"#).is_err());
    }
}
