use std::io::IsTerminal;

use catalogrest_request::{RequestKind, RestRequest};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value;

use crate::exit::{CliError, CliResult, INTERNAL};

pub const REQUEST_SCHEMA_ID: &str = "https://schemas.catalogrest.dev/cli/v1/request.schema.json";

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct RequestOutput<'a> {
    schema_id: &'a str,
    kind: RequestKind,
    body: &'a Value,
}

/// Print a built request. `raw` prints only the body a transport would send.
pub fn print_request(request: &RestRequest, format: OutputFormat) -> CliResult<()> {
    let body = request
        .to_body()
        .map_err(|err| CliError::new(INTERNAL, format!("failed encoding request: {err}")))?;
    let kind = request.kind();

    match format {
        OutputFormat::Json => {
            let out = RequestOutput {
                schema_id: REQUEST_SCHEMA_ID,
                kind,
                body: &body,
            };
            println!("{}", encode(&out, false)?);
        }
        OutputFormat::Table => {
            println!("{}", request_table(kind, &body));
        }
        OutputFormat::Pretty => {
            println!("kind: {kind}");
            println!("{}", encode(&body, true)?);
        }
        OutputFormat::Raw => {
            println!("{body}");
        }
    }
    Ok(())
}

fn encode<T: Serialize>(value: &T, pretty: bool) -> CliResult<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    text.map_err(|err| CliError::new(INTERNAL, format!("failed encoding output: {err}")))
}

fn request_table(kind: RequestKind, body: &Value) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["FIELD", "VALUE"])
        .add_row(vec!["kind".to_string(), kind.to_string()]);

    if let Value::Object(fields) = body {
        for (name, value) in fields {
            table.add_row(vec![name.clone(), cell_text(value)]);
        }
    }
    table
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) if items.is_empty() => "-".to_string(),
        Value::Object(map) if map.is_empty() => "-".to_string(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{k}={}", cell_text(v)))
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Array(items) => items.iter().map(cell_text).collect::<Vec<_>>().join("\n"),
        other => other.to_string(),
    }
}
