//! Command dispatch module for routing CLI commands to their handlers.

use crate::cli::{Cli, Commands, ConfigCommands, Shell};
use crate::commands::{self, check::CheckOptions, CommandContext, CommandError, Result};

/// A parsed command, ready to run.
pub enum Dispatch<'a> {
    Check(CheckOptions),
    Parse(&'a str),
    Eval { expr: &'a str, text: &'a str },
    Config(&'a Option<ConfigCommands>),
    Completions(&'a Shell),
    Help,
}

impl<'a> Dispatch<'a> {
    /// Creates a dispatch from the CLI command.
    pub fn from_cli(cli: &'a Cli) -> Self {
        match &cli.command {
            Some(Commands::Check {
                names,
                columns,
                input,
                output,
                workers,
                keep_text,
            }) => Self::Check(CheckOptions {
                names: names
                    .iter()
                    .chain(columns)
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty())
                    .collect(),
                input: input.clone(),
                output: output.clone(),
                workers: workers.map(usize::from),
                keep_text: *keep_text,
            }),
            Some(Commands::Parse { expr }) => Self::Parse(expr),
            Some(Commands::Eval { expr, text }) => Self::Eval { expr, text },
            Some(Commands::Config { command }) => Self::Config(command),
            Some(Commands::Completions { shell }) => Self::Completions(shell),
            None => Self::Help,
        }
    }

    /// Runs the command.
    pub fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Check(opts) => commands::check::execute(ctx, opts),
            Self::Parse(expr) => commands::parse::execute(ctx, expr),
            Self::Eval { expr, text } => commands::eval::execute(ctx, expr, text),
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("sift - Boolean full-text query classifier");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_check_merges_names_and_columns() {
        let cli = Cli::parse_from(["sift", "check", "a", "--columns", "b, c", "--workers", "3"]);
        match Dispatch::from_cli(&cli) {
            Dispatch::Check(opts) => {
                assert_eq!(opts.names, vec!["a", "b", "c"]);
                assert_eq!(opts.workers, Some(3));
                assert!(!opts.keep_text);
            }
            _ => panic!("Expected Check dispatch"),
        }
    }

    #[test]
    fn test_no_command_is_help() {
        let cli = Cli::parse_from(["sift"]);
        assert!(matches!(Dispatch::from_cli(&cli), Dispatch::Help));
    }

    #[test]
    fn test_eval_dispatch_borrows_args() {
        let cli = Cli::parse_from(["sift", "eval", "a OR b", "b"]);
        match Dispatch::from_cli(&cli) {
            Dispatch::Eval { expr, text } => {
                assert_eq!(expr, "a OR b");
                assert_eq!(text, "b");
            }
            _ => panic!("Expected Eval dispatch"),
        }
    }
}
