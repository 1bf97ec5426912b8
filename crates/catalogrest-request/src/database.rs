use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::check::{map_keys, sequence_entries, unique_map};
use crate::error::{RequestError, Result};
use crate::naming::NamingRules;

/// Request to create a database with creation-time properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCreateDatabaseRequest")]
pub struct CreateDatabaseRequest {
    name: String,
    properties: BTreeMap<String, String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCreateDatabaseRequest {
    name: String,
    #[serde(deserialize_with = "unique_map")]
    properties: BTreeMap<String, String>,
}

impl TryFrom<RawCreateDatabaseRequest> for CreateDatabaseRequest {
    type Error = RequestError;

    fn try_from(raw: RawCreateDatabaseRequest) -> Result<Self> {
        Self::new(raw.name, raw.properties)
    }
}

impl CreateDatabaseRequest {
    /// Create a request using the default (permissive) naming rules.
    pub fn new(name: impl Into<String>, properties: BTreeMap<String, String>) -> Result<Self> {
        Self::with_rules(name, properties, &NamingRules::default())
    }

    /// Create a request, checking `name` against `rules`.
    pub fn with_rules(
        name: impl Into<String>,
        properties: BTreeMap<String, String>,
        rules: &NamingRules,
    ) -> Result<Self> {
        let name = name.into();
        rules.check("name", &name)?;
        map_keys("properties", &properties)?;
        Ok(Self { name, properties })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }
}

/// Request to remove and update properties of an existing database.
///
/// Removals may repeat and may name keys the database does not have. A key
/// may not be both removed and updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAlterDatabaseRequest")]
pub struct AlterDatabaseRequest {
    removals: Vec<String>,
    updates: BTreeMap<String, String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAlterDatabaseRequest {
    removals: Vec<String>,
    #[serde(deserialize_with = "unique_map")]
    updates: BTreeMap<String, String>,
}

impl TryFrom<RawAlterDatabaseRequest> for AlterDatabaseRequest {
    type Error = RequestError;

    fn try_from(raw: RawAlterDatabaseRequest) -> Result<Self> {
        Self::new(raw.removals, raw.updates)
    }
}

impl AlterDatabaseRequest {
    pub fn new(removals: Vec<String>, updates: BTreeMap<String, String>) -> Result<Self> {
        sequence_entries("removals", &removals)?;
        map_keys("updates", &updates)?;

        if let Some((index, key)) = removals
            .iter()
            .enumerate()
            .find(|(_, key)| updates.contains_key(key.as_str()))
        {
            return Err(RequestError::validation(
                format!("removals[{index}]"),
                format!("key {key:?} is also in updates"),
            ));
        }

        Ok(Self { removals, updates })
    }

    pub fn removals(&self) -> &[String] {
        &self.removals
    }

    pub fn updates(&self) -> &BTreeMap<String, String> {
        &self.updates
    }

    /// Removals with repeats dropped, in first-seen order.
    pub fn distinct_removals(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.removals
            .iter()
            .map(String::as_str)
            .filter(|key| seen.insert(*key))
            .collect()
    }

    /// Whether both requests have the same effect once removals are deduplicated.
    pub fn is_equivalent_to(&self, other: &Self) -> bool {
        let ours: BTreeSet<&str> = self.removals.iter().map(String::as_str).collect();
        let theirs: BTreeSet<&str> = other.removals.iter().map(String::as_str).collect();
        ours == theirs && self.updates == other.updates
    }

    /// Apply the alteration to a property map.
    ///
    /// Removals run first. Removing a key that is not present is recorded
    /// in [`AlterOutcome::missing`] and is not an error.
    pub fn apply(&self, properties: &mut BTreeMap<String, String>) -> AlterOutcome {
        let mut outcome = AlterOutcome::default();

        for key in self.distinct_removals() {
            if properties.remove(key).is_some() {
                outcome.removed.push(key.to_string());
            } else {
                outcome.missing.push(key.to_string());
            }
        }

        for (key, value) in &self.updates {
            properties.insert(key.clone(), value.clone());
            outcome.updated.push(key.clone());
        }

        outcome
    }
}

/// What [`AlterDatabaseRequest::apply`] did to a property map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlterOutcome {
    /// Keys that were present and removed.
    pub removed: Vec<String>,
    /// Keys that were added or overwritten.
    pub updated: Vec<String>,
    /// Keys asked for removal that were not present.
    pub missing: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn keys(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn create_database_with_properties() {
        let request = CreateDatabaseRequest::new("sales", map(&[("owner", "team_a")])).unwrap();
        assert_eq!(request.name(), "sales");
        assert_eq!(request.properties()["owner"], "team_a");
    }

    #[test]
    fn create_database_rejects_empty_name() {
        let err = CreateDatabaseRequest::new("", BTreeMap::new()).unwrap_err();
        assert!(matches!(err, RequestError::Validation { .. }));
        assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn create_database_rejects_empty_property_key() {
        let err = CreateDatabaseRequest::new("sales", map(&[("", "x")])).unwrap_err();
        assert_eq!(err.field(), Some("properties"));
    }

    #[test]
    fn create_database_reports_name_before_properties() {
        let err = CreateDatabaseRequest::new("", map(&[("", "x")])).unwrap_err();
        assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn create_database_applies_naming_rules() {
        let rules = NamingRules {
            max_name_length: Some(4),
            ..NamingRules::default()
        };
        assert!(CreateDatabaseRequest::with_rules("sale", BTreeMap::new(), &rules).is_ok());
        let err = CreateDatabaseRequest::with_rules("sales", BTreeMap::new(), &rules).unwrap_err();
        assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn alter_database_disjoint_keys() {
        let request =
            AlterDatabaseRequest::new(keys(&["legacy_flag"]), map(&[("region", "us-east")]))
                .unwrap();
        assert_eq!(request.removals(), ["legacy_flag"]);
        assert_eq!(request.updates()["region"], "us-east");
    }

    #[test]
    fn alter_database_rejects_conflicting_key() {
        let err = AlterDatabaseRequest::new(keys(&["owner"]), map(&[("owner", "team_b")]))
            .unwrap_err();
        match err {
            RequestError::Validation { field, reason } => {
                assert_eq!(field, "removals[0]");
                assert!(reason.contains("\"owner\""));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn alter_database_reports_first_conflict() {
        let err = AlterDatabaseRequest::new(
            keys(&["keep", "b", "a"]),
            map(&[("a", "1"), ("b", "2")]),
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("removals[1]"));
    }

    #[test]
    fn alter_database_rejects_empty_entries() {
        let err = AlterDatabaseRequest::new(keys(&["a", ""]), BTreeMap::new()).unwrap_err();
        assert_eq!(err.field(), Some("removals[1]"));

        let err = AlterDatabaseRequest::new(Vec::new(), map(&[("", "v")])).unwrap_err();
        assert_eq!(err.field(), Some("updates"));
    }

    #[test]
    fn duplicate_removals_are_equivalent() {
        let twice = AlterDatabaseRequest::new(keys(&["a", "a"]), BTreeMap::new()).unwrap();
        let once = AlterDatabaseRequest::new(keys(&["a"]), BTreeMap::new()).unwrap();

        assert_ne!(twice, once);
        assert!(twice.is_equivalent_to(&once));
        assert_eq!(twice.distinct_removals(), once.distinct_removals());
    }

    #[test]
    fn distinct_removals_keep_first_seen_order() {
        let request =
            AlterDatabaseRequest::new(keys(&["z", "a", "z", "m", "a"]), BTreeMap::new()).unwrap();
        assert_eq!(request.distinct_removals(), vec!["z", "a", "m"]);
    }

    #[test]
    fn apply_reports_removed_updated_and_missing() {
        let request = AlterDatabaseRequest::new(
            keys(&["a", "a", "z"]),
            map(&[("region", "us-east"), ("b", "2")]),
        )
        .unwrap();
        let mut properties = map(&[("a", "1"), ("b", "old")]);

        let outcome = request.apply(&mut properties);

        assert_eq!(outcome.removed, keys(&["a"]));
        assert_eq!(outcome.missing, keys(&["z"]));
        assert_eq!(outcome.updated, keys(&["b", "region"]));
        assert_eq!(properties, map(&[("b", "2"), ("region", "us-east")]));
    }

    #[test]
    fn apply_twice_is_idempotent() {
        let request = AlterDatabaseRequest::new(keys(&["a"]), map(&[("b", "2")])).unwrap();
        let mut properties = map(&[("a", "1")]);

        request.apply(&mut properties);
        let snapshot = properties.clone();
        let second = request.apply(&mut properties);

        assert_eq!(properties, snapshot);
        assert_eq!(second.missing, keys(&["a"]));
    }

    #[test]
    fn deserialize_rejects_invalid_bodies() {
        assert!(serde_json::from_str::<CreateDatabaseRequest>(
            r#"{"name":"","properties":{}}"#
        )
        .is_err());
        assert!(serde_json::from_str::<AlterDatabaseRequest>(
            r#"{"removals":["owner"],"updates":{"owner":"x"}}"#
        )
        .is_err());
        assert!(serde_json::from_str::<CreateDatabaseRequest>(
            r#"{"name":"a","properties":{},"extra":1}"#
        )
        .is_err());
    }

    #[test]
    fn deserialize_rejects_repeated_map_keys() {
        let err = serde_json::from_str::<CreateDatabaseRequest>(
            r#"{"name":"sales","properties":{"owner":"team_a","owner":"team_b"}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("owner"));

        assert!(serde_json::from_str::<AlterDatabaseRequest>(
            r#"{"removals":[],"updates":{"region":"eu","region":"us"}}"#
        )
        .is_err());
    }

    #[test]
    fn serialized_body_reads_back_equal() {
        let request = AlterDatabaseRequest::new(keys(&["a", "a"]), map(&[("b", "2")])).unwrap();
        let body = serde_json::to_string(&request).unwrap();
        assert_eq!(body, r#"{"removals":["a","a"],"updates":{"b":"2"}}"#);
        let back: AlterDatabaseRequest = serde_json::from_str(&body).unwrap();
        assert_eq!(back, request);
    }
}
