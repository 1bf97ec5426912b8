//! Schemas for the request kinds this workspace knows about.
//!
//! They check shape only. Cross-field rules such as a key being both removed
//! and updated are enforced when the request is built.

use catalogrest_request::RequestKind;

const CREATE_DATABASE: &str = r#"{
    "$schema": "https://json-schema.org/draft/2020-12/schema",
    "$id": "https://schemas.catalogrest.dev/v1/create-database.schema.json",
    "title": "CreateDatabaseRequest",
    "type": "object",
    "properties": {
        "name": { "type": "string", "minLength": 1 },
        "properties": {
            "type": "object",
            "propertyNames": { "minLength": 1 },
            "additionalProperties": { "type": "string" }
        }
    },
    "required": ["name", "properties"],
    "additionalProperties": false
}"#;

const ALTER_DATABASE: &str = r#"{
    "$schema": "https://json-schema.org/draft/2020-12/schema",
    "$id": "https://schemas.catalogrest.dev/v1/alter-database.schema.json",
    "title": "AlterDatabaseRequest",
    "type": "object",
    "properties": {
        "removals": {
            "type": "array",
            "items": { "type": "string", "minLength": 1 }
        },
        "updates": {
            "type": "object",
            "propertyNames": { "minLength": 1 },
            "additionalProperties": { "type": "string" }
        }
    },
    "required": ["removals", "updates"],
    "additionalProperties": false
}"#;

const RENAME_TABLE: &str = r##"{
    "$schema": "https://json-schema.org/draft/2020-12/schema",
    "$id": "https://schemas.catalogrest.dev/v1/rename-table.schema.json",
    "title": "RenameTableRequest",
    "type": "object",
    "properties": {
        "source": { "$ref": "#/$defs/identifier" },
        "destination": { "$ref": "#/$defs/identifier" }
    },
    "required": ["source", "destination"],
    "additionalProperties": false,
    "$defs": {
        "identifier": {
            "type": "object",
            "properties": {
                "database_name": { "type": "string", "minLength": 1 },
                "object_name": { "type": "string", "minLength": 1 }
            },
            "required": ["database_name", "object_name"],
            "additionalProperties": false
        }
    }
}"##;

/// The built-in JSON Schema text for `kind`.
pub fn builtin_schema(kind: RequestKind) -> &'static str {
    match kind {
        RequestKind::CreateDatabase => CREATE_DATABASE,
        RequestKind::AlterDatabase => ALTER_DATABASE,
        RequestKind::RenameTable => RENAME_TABLE,
    }
}
