mod cmd;
mod exit;
mod logging;
mod output;

use catalogrest_request::NamingRules;
use clap::Parser;

use crate::cmd::{Command, Context};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "catalogrest", version, about = "REST catalog request builder")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        env = "CATALOGREST_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    /// Longest database name the catalog accepts, in characters.
    #[arg(long, value_name = "N", env = "CATALOGREST_MAX_NAME_LENGTH", global = true)]
    max_name_length: Option<usize>,

    /// Characters the catalog forbids in database names (e.g. "./").
    #[arg(long, value_name = "CHARS", env = "CATALOGREST_FORBIDDEN_CHARS", global = true)]
    forbidden_chars: Option<String>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn naming_rules(&self) -> NamingRules {
        NamingRules {
            max_name_length: self.max_name_length,
            forbidden_chars: self
                .forbidden_chars
                .as_deref()
                .map(|chars| chars.chars().collect())
                .unwrap_or_default(),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let ctx = Context {
        format: cli.format.unwrap_or_else(OutputFormat::default_for_stdout),
        rules: cli.naming_rules(),
    };
    let result = cmd::run(cli.command, &ctx);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}
