//! JSON Schema contracts for REST catalog request bodies.
//!
//! Check raw bodies against JSON Schema 2020-12 before they are classified
//! or sent. Built-in schemas describe every known request kind; catalogs
//! with extra constraints register their own.

pub mod builtin;
pub mod config;
pub mod error;
pub mod registry;
pub mod validator;

pub use builtin::builtin_schema;
pub use config::{RegistryConfig, DEFAULT_MAX_BODY_SIZE};
pub use error::{Result, SchemaError};
pub use registry::SchemaRegistry;
