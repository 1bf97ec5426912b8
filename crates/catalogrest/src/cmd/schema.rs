use catalogrest_schema::builtin_schema;

use crate::cmd::SchemaArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: SchemaArgs) -> CliResult<i32> {
    println!("{}", builtin_schema(args.kind));
    Ok(SUCCESS)
}
