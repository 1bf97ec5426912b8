use std::fs;

use catalogrest_request::{classify_as_request, RequestError, RequestKind, RestRequest};
use catalogrest_schema::SchemaRegistry;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cmd::{CheckArgs, Context};
use crate::exit::{io_error, request_error, schema_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::print_request;

/// Check order: JSON syntax, request shape, schema contract, then the
/// request's own invariants. The last step reads the raw text again so
/// repeated keys are refused.
pub fn run(args: CheckArgs, ctx: &Context) -> CliResult<i32> {
    let text = read_body(&args)?;
    let value: Value = serde_json::from_str(&text)
        .map_err(|err| request_error("invalid request body", RequestError::InvalidJson(err)))?;

    let kind = resolve_kind(&value, args.kind).map_err(|err| {
        warn!(error = %err, "rejected request body");
        request_error("unrecognized request body", err)
    })?;

    let registry = match &args.schema_dir {
        Some(dir) => SchemaRegistry::from_directory(dir),
        None => SchemaRegistry::builtin(),
    }
    .map_err(|err| schema_error("failed loading schemas", err))?;

    registry.validate(kind, text.as_bytes()).map_err(|err| {
        warn!(%kind, error = %err, "request body failed schema check");
        schema_error("schema check failed", err)
    })?;

    let request = RestRequest::from_json_with_rules(&text, &ctx.rules).map_err(|err| {
        warn!(%kind, error = %err, "request body failed validation");
        request_error("invalid request", err)
    })?;

    debug!(%kind, "request body accepted");
    print_request(&request, ctx.format)?;
    Ok(SUCCESS)
}

fn read_body(args: &CheckArgs) -> CliResult<String> {
    if let Some(json) = &args.json {
        return Ok(json.clone());
    }
    if let Some(path) = &args.file {
        return fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Err(CliError::new(USAGE, "one of --json or --file is required"))
}

/// Classify `value`, and when the caller named a kind, insist it matches.
fn resolve_kind(value: &Value, expected: Option<RequestKind>) -> Result<RequestKind, RequestError> {
    let actual = classify_as_request(value)?;
    match expected {
        Some(expected) if expected != actual => Err(RequestError::TypeMismatch(format!(
            "expected a {expected} body, found {actual}"
        ))),
        _ => Ok(actual),
    }
}
