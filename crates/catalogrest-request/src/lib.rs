//! Validated request shapes for REST catalog clients.
//!
//! Every request is checked when it is built and never changes afterwards.
//! A value that exists is a value a transport layer can encode and send:
//! - [`Identifier`] names an object inside a database
//! - [`CreateDatabaseRequest`] and [`AlterDatabaseRequest`] mutate databases
//! - [`RenameTableRequest`] moves a table between identifiers
//!
//! [`RestRequest`] is the closed set of known requests. Generic code that
//! receives a raw JSON body uses [`classify_as_request`] to find out which
//! request it holds before routing it.

pub mod database;
pub mod error;
pub mod identifier;
pub mod naming;
pub mod request;
pub mod table;

mod check;
mod scan;

pub use database::{AlterDatabaseRequest, AlterOutcome, CreateDatabaseRequest};
pub use error::{RequestError, Result};
pub use identifier::Identifier;
pub use naming::NamingRules;
pub use request::{classify_as_request, CatalogRequest, RequestKind, RestRequest};
pub use table::RenameTableRequest;
