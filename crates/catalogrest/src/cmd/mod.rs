use std::collections::BTreeMap;
use std::path::PathBuf;

use catalogrest_request::{Identifier, NamingRules, RequestKind};
use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod alter_database;
pub mod check;
pub mod create_database;
pub mod rename_table;
pub mod schema;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a create-database request body.
    CreateDatabase(CreateDatabaseArgs),
    /// Build an alter-database request body.
    AlterDatabase(AlterDatabaseArgs),
    /// Build a rename-table request body.
    RenameTable(RenameTableArgs),
    /// Check a raw request body and report its kind.
    Check(CheckArgs),
    /// Print the built-in JSON Schema for a request kind.
    Schema(SchemaArgs),
    /// Show version information.
    Version(VersionArgs),
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct Context {
    pub format: OutputFormat,
    pub rules: NamingRules,
}

pub fn run(command: Command, ctx: &Context) -> CliResult<i32> {
    match command {
        Command::CreateDatabase(args) => create_database::run(args, ctx),
        Command::AlterDatabase(args) => alter_database::run(args, ctx),
        Command::RenameTable(args) => rename_table::run(args, ctx),
        Command::Check(args) => check::run(args, ctx),
        Command::Schema(args) => schema::run(args),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct CreateDatabaseArgs {
    /// Name of the database to create.
    pub name: String,
    /// Creation-time property (repeatable).
    #[arg(long = "property", short = 'p', value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub properties: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct AlterDatabaseArgs {
    /// Property key to remove (repeatable).
    #[arg(long = "remove", value_name = "KEY")]
    pub removals: Vec<String>,
    /// Property to add or overwrite (repeatable).
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub updates: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct RenameTableArgs {
    /// Current table, as <database>.<table>.
    #[arg(value_parser = parse_identifier)]
    pub source: Identifier,
    /// New table, as <database>.<table>.
    #[arg(value_parser = parse_identifier)]
    pub destination: Identifier,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Request body as JSON text.
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub json: Option<String>,
    /// Read the request body from a file.
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Expected request kind. Default: inferred from the body.
    #[arg(long, value_parser = parse_kind)]
    pub kind: Option<RequestKind>,
    /// Directory of <kind>.schema.json files to check against instead of the built-in schemas.
    #[arg(long, value_name = "DIR", env = "CATALOGREST_SCHEMA_DIR")]
    pub schema_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Request kind (create-database, alter-database, rename-table).
    #[arg(value_parser = parse_kind)]
    pub kind: RequestKind,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub(crate) fn parse_key_value(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("expected KEY=VALUE, got {input:?}")),
    }
}

fn parse_identifier(input: &str) -> Result<Identifier, String> {
    Identifier::parse(input).map_err(|err| err.to_string())
}

fn parse_kind(input: &str) -> Result<RequestKind, String> {
    input.parse().map_err(|_| {
        let known = RequestKind::ALL
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("unknown request kind {input:?} (expected one of: {known})")
    })
}

/// Collect repeated KEY=VALUE flags, refusing to silently drop a repeated key.
pub(crate) fn collect_pairs(
    flag: &str,
    pairs: Vec<(String, String)>,
) -> CliResult<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for (key, value) in pairs {
        if map.contains_key(&key) {
            return Err(CliError::new(
                USAGE,
                format!("--{flag} given more than once for key {key:?}"),
            ));
        }
        map.insert(key, value);
    }
    Ok(map)
}
