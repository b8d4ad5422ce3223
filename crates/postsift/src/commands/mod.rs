//! Command implementations for the sift CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod check;
pub mod completions;
pub mod config;
pub mod eval;
pub mod parse;

use postsift_query::{QueryError, QuerySetError};

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// A query expression failed to parse.
    #[error("query error: {0}")]
    Query(#[from] QueryError),

    /// A named query failed to parse.
    #[error("{0}")]
    QuerySet(#[from] QuerySetError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Missing or unusable input.
    #[error("input error: {0}")]
    Input(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited record error.
    #[error("record error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && std::env::var_os("NO_COLOR").is_none(),
            quiet: cli.quiet,
            verbose: cli.verbose,
        }
    }
}
