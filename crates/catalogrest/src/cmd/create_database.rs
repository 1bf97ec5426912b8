use catalogrest_request::CreateDatabaseRequest;
use tracing::debug;

use crate::cmd::{collect_pairs, Context, CreateDatabaseArgs};
use crate::exit::{request_error, CliResult, SUCCESS};
use crate::output::print_request;

pub fn run(args: CreateDatabaseArgs, ctx: &Context) -> CliResult<i32> {
    let properties = collect_pairs("property", args.properties)?;
    let request = CreateDatabaseRequest::with_rules(args.name, properties, &ctx.rules)
        .map_err(|err| request_error("invalid create-database request", err))?;

    debug!(
        name = request.name(),
        properties = request.properties().len(),
        "built create-database request"
    );
    print_request(&request.into(), ctx.format)?;
    Ok(SUCCESS)
}
