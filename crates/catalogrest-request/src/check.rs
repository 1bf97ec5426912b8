use std::collections::BTreeMap;
use std::fmt;

use serde::de::{Deserializer, Error as _, MapAccess, Visitor};

use crate::error::{RequestError, Result};

pub(crate) fn non_empty(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(RequestError::validation(field, "must not be empty"));
    }
    Ok(())
}

pub(crate) fn map_keys(field: &str, map: &BTreeMap<String, String>) -> Result<()> {
    // BTreeMap sorts "" first, so only the first key can be empty.
    if map.keys().next().is_some_and(|key| key.is_empty()) {
        return Err(RequestError::validation(field, "keys must not be empty"));
    }
    Ok(())
}

pub(crate) fn sequence_entries(field: &str, entries: &[String]) -> Result<()> {
    match entries.iter().position(|entry| entry.is_empty()) {
        Some(index) => Err(RequestError::validation(
            format!("{field}[{index}]"),
            "must not be empty",
        )),
        None => Ok(()),
    }
}

/// Deserialize a string map, failing on a repeated key instead of keeping
/// the last value.
pub(crate) fn unique_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, String>, D::Error> {
    struct UniqueMap;

    impl<'de> Visitor<'de> for UniqueMap {
        type Value = BTreeMap<String, String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of strings")
        }

        fn visit_map<A: MapAccess<'de>>(
            self,
            mut access: A,
        ) -> std::result::Result<Self::Value, A::Error> {
            let mut map = BTreeMap::new();
            while let Some((key, value)) = access.next_entry::<String, String>()? {
                if map.contains_key(&key) {
                    return Err(A::Error::custom(format!("duplicate key {key:?}")));
                }
                map.insert(key, value);
            }
            Ok(map)
        }
    }

    deserializer.deserialize_map(UniqueMap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_reported_on_map_field() {
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), "1".to_string());
        map.insert(String::new(), "2".to_string());

        let err = map_keys("updates", &map).unwrap_err();
        assert_eq!(err.field(), Some("updates"));
    }

    #[test]
    fn empty_values_are_allowed() {
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), String::new());
        assert!(map_keys("properties", &map).is_ok());
    }

    #[derive(serde::Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "unique_map")]
        map: BTreeMap<String, String>,
    }

    #[test]
    fn unique_map_rejects_repeated_keys() {
        let ok: Holder = serde_json::from_str(r#"{"map":{"a":"1","b":"2"}}"#).unwrap();
        assert_eq!(ok.map.len(), 2);

        let err = serde_json::from_str::<Holder>(r#"{"map":{"a":"1","a":"2"}}"#)
            .err()
            .unwrap();
        assert!(err.to_string().contains("duplicate key \"a\""));
    }

    #[test]
    fn sequence_reports_first_empty_index() {
        let entries = vec!["a".to_string(), String::new(), String::new()];
        let err = sequence_entries("removals", &entries).unwrap_err();
        assert_eq!(err.field(), Some("removals[1]"));
    }
}
