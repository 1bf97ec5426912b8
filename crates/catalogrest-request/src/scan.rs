//! Reads a JSON body into a [`Value`] while remembering repeated object keys.
//!
//! `serde_json` keeps the last value of a repeated key and drops the rest;
//! request bodies must reject them instead, so the reader records where
//! each repeat happened.

use std::fmt;

use serde::de::{DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Value};

/// A parsed body plus every `(object path, key)` that appeared twice.
///
/// Paths use the same notation as validation errors: `""` for the body
/// itself, `properties`, `source`, `removals[2]`.
#[derive(Debug, Default)]
pub(crate) struct Scanned {
    pub value: Value,
    pub repeated: Vec<(String, String)>,
}

pub(crate) fn scan<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Scanned, D::Error> {
    let mut repeated = Vec::new();
    let value = ScanSeed {
        path: String::new(),
        repeated: &mut repeated,
    }
    .deserialize(deserializer)?;
    Ok(Scanned { value, repeated })
}

pub(crate) fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

struct ScanSeed<'a> {
    path: String,
    repeated: &'a mut Vec<(String, String)>,
}

impl<'de> DeserializeSeed<'de> for ScanSeed<'_> {
    type Value = Value;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for ScanSeed<'_> {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        DeserializeSeed::deserialize(self, deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element_seed(ScanSeed {
            path: format!("{}[{}]", self.path, items.len()),
            repeated: &mut *self.repeated,
        })? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut object = Map::new();
        while let Some(key) = map.next_key::<String>()? {
            let value = map.next_value_seed(ScanSeed {
                path: child_path(&self.path, &key),
                repeated: &mut *self.repeated,
            })?;
            if object.insert(key.clone(), value).is_some() {
                self.repeated.push((self.path.clone(), key));
            }
        }
        Ok(Value::Object(object))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn scan_str(text: &str) -> Scanned {
        scan(&mut serde_json::Deserializer::from_str(text)).unwrap()
    }

    #[test]
    fn value_matches_serde_json() {
        let text = r#"{"a":[1,-2,2.5,true,null,"s"],"b":{"c":{}}}"#;
        let expected: Value = serde_json::from_str(text).unwrap();
        let scanned = scan_str(text);
        assert_eq!(scanned.value, expected);
        assert!(scanned.repeated.is_empty());
    }

    #[test]
    fn repeats_are_recorded_with_paths() {
        let scanned = scan_str(
            r#"{"name":"a","name":"b","properties":{"k":"1","k":"2"},"list":[{"x":1,"x":2}]}"#,
        );
        assert_eq!(
            scanned.repeated,
            vec![
                (String::new(), "name".to_string()),
                ("properties".to_string(), "k".to_string()),
                ("list[0]".to_string(), "x".to_string()),
            ]
        );
        assert_eq!(scanned.value["properties"], json!({"k": "2"}));
    }
}
