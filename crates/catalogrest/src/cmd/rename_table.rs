use catalogrest_request::RenameTableRequest;
use tracing::debug;

use crate::cmd::{Context, RenameTableArgs};
use crate::exit::{request_error, CliResult, SUCCESS};
use crate::output::print_request;

pub fn run(args: RenameTableArgs, ctx: &Context) -> CliResult<i32> {
    let request = RenameTableRequest::new(args.source, args.destination)
        .map_err(|err| request_error("invalid rename-table request", err))?;

    debug!(
        source = %request.source(),
        destination = %request.destination(),
        cross_database = request.crosses_databases(),
        "built rename-table request"
    );
    print_request(&request.into(), ctx.format)?;
    Ok(SUCCESS)
}
