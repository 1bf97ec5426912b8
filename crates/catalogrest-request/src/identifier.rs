use std::fmt;

use serde::{Deserialize, Serialize};

use crate::check::non_empty;
use crate::error::{RequestError, Result};

/// Separator between database and object in a qualified name.
pub const QUALIFIER: char = '.';

/// A named object inside a named database.
///
/// Both names are kept exactly as given. The pair cannot be changed once
/// built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawIdentifier")]
pub struct Identifier {
    database_name: String,
    object_name: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawIdentifier {
    database_name: String,
    object_name: String,
}

impl TryFrom<RawIdentifier> for Identifier {
    type Error = RequestError;

    fn try_from(raw: RawIdentifier) -> Result<Self> {
        Self::new(raw.database_name, raw.object_name)
    }
}

impl Identifier {
    /// Create an identifier. Fails if either name is empty.
    pub fn new(database_name: impl Into<String>, object_name: impl Into<String>) -> Result<Self> {
        let database_name = database_name.into();
        let object_name = object_name.into();
        non_empty("database_name", &database_name)?;
        non_empty("object_name", &object_name)?;
        Ok(Self {
            database_name,
            object_name,
        })
    }

    /// Parse a qualified `database.object` name.
    ///
    /// Splits at the first `.`, so the object part may itself contain dots.
    pub fn parse(qualified: &str) -> Result<Self> {
        match qualified.split_once(QUALIFIER) {
            Some((database, object)) => Self::new(database, object),
            None => Err(RequestError::validation(
                "identifier",
                format!("expected <database>{QUALIFIER}<object>, got {qualified:?}"),
            )),
        }
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    /// Split into `(database_name, object_name)`.
    pub fn into_parts(self) -> (String, String) {
        (self.database_name, self.object_name)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{QUALIFIER}{}", self.database_name, self.object_name)
    }
}

impl std::str::FromStr for Identifier {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
