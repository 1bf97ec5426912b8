use serde::{Deserialize, Serialize};

use crate::error::{RequestError, Result};
use crate::identifier::Identifier;

/// Request to rename (or move) a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRenameTableRequest")]
pub struct RenameTableRequest {
    source: Identifier,
    destination: Identifier,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRenameTableRequest {
    source: Identifier,
    destination: Identifier,
}

impl TryFrom<RawRenameTableRequest> for RenameTableRequest {
    type Error = RequestError;

    fn try_from(raw: RawRenameTableRequest) -> Result<Self> {
        Self::new(raw.source, raw.destination)
    }
}

impl RenameTableRequest {
    /// Fails when `destination` names the same table as `source`.
    pub fn new(source: Identifier, destination: Identifier) -> Result<Self> {
        if source == destination {
            return Err(RequestError::validation(
                "destination",
                format!("same as source {source}"),
            ));
        }
        Ok(Self {
            source,
            destination,
        })
    }

    pub fn source(&self) -> &Identifier {
        &self.source
    }

    pub fn destination(&self) -> &Identifier {
        &self.destination
    }

    /// Whether the table changes database.
    pub fn crosses_databases(&self) -> bool {
        self.source.database_name() != self.destination.database_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_within_database() {
        let request = RenameTableRequest::new(
            Identifier::parse("sales.orders").unwrap(),
            Identifier::parse("sales.orders_v2").unwrap(),
        )
        .unwrap();
        assert_eq!(request.source().object_name(), "orders");
        assert_eq!(request.destination().object_name(), "orders_v2");
        assert!(!request.crosses_databases());
    }

    #[test]
    fn rename_across_databases() {
        let request = RenameTableRequest::new(
            Identifier::parse("staging.orders").unwrap(),
            Identifier::parse("sales.orders").unwrap(),
        )
        .unwrap();
        assert!(request.crosses_databases());
    }

    #[test]
    fn rename_to_self_is_rejected() {
        let id = Identifier::parse("sales.orders").unwrap();
        let err = RenameTableRequest::new(id.clone(), id).unwrap_err();
        assert_eq!(err.field(), Some("destination"));
    }

    #[test]
    fn nested_identifiers_are_validated_on_deserialize() {
        let body = r#"{
            "source": {"database_name": "sales", "object_name": ""},
            "destination": {"database_name": "sales", "object_name": "b"}
        }"#;
        assert!(serde_json::from_str::<RenameTableRequest>(body).is_err());
    }
}
