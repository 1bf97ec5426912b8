use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::check::sequence_entries;
use crate::database::{AlterDatabaseRequest, CreateDatabaseRequest};
use crate::error::{RequestError, Result};
use crate::identifier::Identifier;
use crate::naming::NamingRules;
use crate::scan::{child_path, scan};
use crate::table::RenameTableRequest;

/// The known kinds of catalog request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestKind {
    CreateDatabase,
    AlterDatabase,
    RenameTable,
}

impl RequestKind {
    pub const ALL: [RequestKind; 3] = [
        RequestKind::CreateDatabase,
        RequestKind::AlterDatabase,
        RequestKind::RenameTable,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RequestKind::CreateDatabase => "create-database",
            RequestKind::AlterDatabase => "alter-database",
            RequestKind::RenameTable => "rename-table",
        }
    }

    /// Top-level fields of this kind's JSON body, sorted.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            RequestKind::CreateDatabase => &["name", "properties"],
            RequestKind::AlterDatabase => &["removals", "updates"],
            RequestKind::RenameTable => &["destination", "source"],
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestKind {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self> {
        RequestKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| RequestError::TypeMismatch(format!("unknown request kind {s:?}")))
    }
}

/// Implemented by every request type, so generic code can take "any request".
pub trait CatalogRequest: Serialize + Into<RestRequest> {
    const KIND: RequestKind;

    /// Encode as a JSON body.
    fn to_body(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl CatalogRequest for CreateDatabaseRequest {
    const KIND: RequestKind = RequestKind::CreateDatabase;
}

impl CatalogRequest for AlterDatabaseRequest {
    const KIND: RequestKind = RequestKind::AlterDatabase;
}

impl CatalogRequest for RenameTableRequest {
    const KIND: RequestKind = RequestKind::RenameTable;
}

/// Any known catalog request.
///
/// Serializes as the bare request body; the kind is implied by its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RestRequest {
    CreateDatabase(CreateDatabaseRequest),
    AlterDatabase(AlterDatabaseRequest),
    RenameTable(RenameTableRequest),
}

impl RestRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            RestRequest::CreateDatabase(_) => RequestKind::CreateDatabase,
            RestRequest::AlterDatabase(_) => RequestKind::AlterDatabase,
            RestRequest::RenameTable(_) => RequestKind::RenameTable,
        }
    }

    /// Classify a JSON body and build the request it describes.
    ///
    /// Shapes that match no request fail with [`RequestError::TypeMismatch`];
    /// a known shape with bad content fails with [`RequestError::Validation`]
    /// naming the first offending field. A parsed [`Value`] has already lost
    /// repeated keys; use [`RestRequest::from_json`] on raw text to have them
    /// rejected.
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::from_value_with_rules(value, &NamingRules::default())
    }

    /// Like [`RestRequest::from_value`], checking database names against `rules`.
    pub fn from_value_with_rules(value: &Value, rules: &NamingRules) -> Result<Self> {
        build(value, rules, &[])
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_json_with_rules(text, &NamingRules::default())
    }

    /// Parse and build from JSON text. Repeated object keys are rejected.
    pub fn from_json_with_rules(text: &str, rules: &NamingRules) -> Result<Self> {
        let mut deserializer = serde_json::Deserializer::from_str(text);
        let scanned = scan(&mut deserializer)?;
        deserializer.end()?;
        build(&scanned.value, rules, &scanned.repeated)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let mut deserializer = serde_json::Deserializer::from_slice(bytes);
        let scanned = scan(&mut deserializer)?;
        deserializer.end()?;
        build(&scanned.value, &NamingRules::default(), &scanned.repeated)
    }

    /// Encode as a JSON body.
    pub fn to_body(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl<'de> Deserialize<'de> for RestRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let scanned = scan(deserializer)?;
        build(&scanned.value, &NamingRules::default(), &scanned.repeated)
            .map_err(serde::de::Error::custom)
    }
}

impl From<CreateDatabaseRequest> for RestRequest {
    fn from(request: CreateDatabaseRequest) -> Self {
        RestRequest::CreateDatabase(request)
    }
}

impl From<AlterDatabaseRequest> for RestRequest {
    fn from(request: AlterDatabaseRequest) -> Self {
        RestRequest::AlterDatabase(request)
    }
}

impl From<RenameTableRequest> for RestRequest {
    fn from(request: RenameTableRequest) -> Self {
        RestRequest::RenameTable(request)
    }
}

/// Decide which request `value` has the shape of.
///
/// A body matches a kind when its top-level fields are exactly that kind's
/// [`RequestKind::fields`]. Field contents are not checked here.
pub fn classify_as_request(value: &Value) -> Result<RequestKind> {
    let body = as_object(value)?;
    let fields: BTreeSet<&str> = body.keys().map(String::as_str).collect();

    let kind = RequestKind::ALL
        .into_iter()
        .find(|kind| fields.iter().copied().eq(kind.fields().iter().copied()))
        .ok_or_else(|| {
            let names = fields.into_iter().collect::<Vec<_>>().join(", ");
            RequestError::TypeMismatch(format!("no request has fields [{names}]"))
        })?;

    debug!(%kind, "classified request body");
    Ok(kind)
}

fn as_object(value: &Value) -> Result<&Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        RequestError::TypeMismatch(format!("expected a JSON object, found {}", json_type(value)))
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Fields are read and checked in declaration order, so the error names the
/// first offending field.
fn build(value: &Value, rules: &NamingRules, repeated: &[(String, String)]) -> Result<RestRequest> {
    let kind = classify_as_request(value)?;
    let body = Body {
        fields: as_object(value)?,
        path: String::new(),
        repeated,
    };

    let request = match kind {
        RequestKind::CreateDatabase => {
            let name = body.string("name")?;
            rules.check("name", &name)?;
            let properties = body.string_map("properties")?;
            CreateDatabaseRequest::with_rules(name, properties, rules)?.into()
        }
        RequestKind::AlterDatabase => {
            let removals = body.string_list("removals")?;
            sequence_entries("removals", &removals)?;
            let updates = body.string_map("updates")?;
            AlterDatabaseRequest::new(removals, updates)?.into()
        }
        RequestKind::RenameTable => {
            let source = body.identifier("source")?;
            let destination = body.identifier("destination")?;
            RenameTableRequest::new(source, destination)?.into()
        }
    };

    Ok(request)
}

fn expected(path: String, what: &str, found: &Value) -> RequestError {
    RequestError::validation(path, format!("expected {what}, found {}", json_type(found)))
}

/// One JSON object of a body, with its path for error messages.
struct Body<'a> {
    fields: &'a Map<String, Value>,
    path: String,
    repeated: &'a [(String, String)],
}

impl<'a> Body<'a> {
    fn path_of(&self, name: &str) -> String {
        child_path(&self.path, name)
    }

    fn repeated_key_in(&self, object_path: &str) -> Option<&'a str> {
        self.repeated
            .iter()
            .find(|(path, _)| path == object_path)
            .map(|(_, key)| key.as_str())
    }

    fn field(&self, name: &str) -> Result<&'a Value> {
        if self
            .repeated
            .iter()
            .any(|(path, key)| *path == self.path && key == name)
        {
            return Err(RequestError::validation(
                self.path_of(name),
                "given more than once",
            ));
        }
        self.fields
            .get(name)
            .ok_or_else(|| RequestError::validation(self.path_of(name), "missing"))
    }

    fn string(&self, name: &str) -> Result<String> {
        match self.field(name)? {
            Value::String(s) => Ok(s.clone()),
            other => Err(expected(self.path_of(name), "a string", other)),
        }
    }

    fn string_map(&self, name: &str) -> Result<BTreeMap<String, String>> {
        let path = self.path_of(name);
        let map = match self.field(name)? {
            Value::Object(map) => map,
            other => return Err(expected(path, "an object", other)),
        };
        if let Some(key) = self.repeated_key_in(&path) {
            return Err(RequestError::validation(
                path,
                format!("duplicate key {key:?}"),
            ));
        }

        map.iter()
            .map(|(key, value)| match value {
                Value::String(s) => Ok((key.clone(), s.clone())),
                other => Err(expected(child_path(&path, key), "a string", other)),
            })
            .collect()
    }

    fn string_list(&self, name: &str) -> Result<Vec<String>> {
        let items = match self.field(name)? {
            Value::Array(items) => items,
            other => return Err(expected(self.path_of(name), "an array", other)),
        };

        items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(expected(
                    format!("{}[{index}]", self.path_of(name)),
                    "a string",
                    other,
                )),
            })
            .collect()
    }

    fn identifier(&self, name: &str) -> Result<Identifier> {
        let inner = match self.field(name)? {
            Value::Object(inner) => Body {
                fields: inner,
                path: self.path_of(name),
                repeated: self.repeated,
            },
            other => return Err(expected(self.path_of(name), "an object", other)),
        };

        if let Some(unknown) = inner
            .fields
            .keys()
            .find(|key| !matches!(key.as_str(), "database_name" | "object_name"))
        {
            return Err(RequestError::validation(
                inner.path_of(unknown),
                "unknown field",
            ));
        }

        let database_name = inner.string("database_name")?;
        let object_name = inner.string("object_name")?;
        Identifier::new(database_name, object_name).map_err(|err| match err {
            RequestError::Validation { field, reason } => {
                RequestError::validation(inner.path_of(&field), reason)
            }
            other => other,
        })
    }
}
