use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod dispatch;
mod output;
mod records;

use cli::Cli;
use commands::{CommandContext, CommandError};
use dispatch::Dispatch;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                eprintln!("{error_json:#}");
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

/// Sends tracing output to stderr. `RUST_LOG` takes precedence over the
/// `--verbose`/`--quiet` level.
fn init_tracing(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> commands::Result<()> {
    let ctx = CommandContext::from_cli(cli);
    Dispatch::from_cli(cli).execute(&ctx)
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Query(_) | CommandError::QuerySet(_) => "QUERY_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Input(_) => "INPUT_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Csv(_) => "RECORD_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit status for an error.
fn error_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Query(_) | CommandError::QuerySet(_) => 1,
        CommandError::Json(_) => 1,
        CommandError::Input(_) | CommandError::Io(_) | CommandError::Csv(_) => 3,
        CommandError::Config(_) => 5,
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    ExitCode::from(error_status(e))
}
