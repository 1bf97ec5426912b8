//! Validated REST catalog requests with JSON Schema contracts.
//!
//! catalogrest builds the request bodies a catalog client sends: every
//! request is checked when it is constructed, so a transport layer only
//! ever sees values it can encode as they are.
//!
//! # Crate Structure
//!
//! - [`request`]: Request types, classification, naming rules
//! - [`schema`]: JSON Schema contracts per request kind (behind `schema` feature)

/// Re-export request types.
pub mod request {
    pub use catalogrest_request::*;
}

/// Re-export schema types (requires `schema` feature).
#[cfg(feature = "schema")]
pub mod schema {
    pub use catalogrest_schema::*;
}
