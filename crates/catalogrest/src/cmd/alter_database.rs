use catalogrest_request::AlterDatabaseRequest;
use tracing::debug;

use crate::cmd::{collect_pairs, AlterDatabaseArgs, Context};
use crate::exit::{request_error, CliResult, SUCCESS};
use crate::output::print_request;

pub fn run(args: AlterDatabaseArgs, ctx: &Context) -> CliResult<i32> {
    let updates = collect_pairs("set", args.updates)?;
    let request = AlterDatabaseRequest::new(args.removals, updates)
        .map_err(|err| request_error("invalid alter-database request", err))?;

    debug!(
        removals = request.distinct_removals().len(),
        updates = request.updates().len(),
        "built alter-database request"
    );
    print_request(&request.into(), ctx.format)?;
    Ok(SUCCESS)
}
