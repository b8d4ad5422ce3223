//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the sift CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// sift - Classify text records against boolean full-text queries
#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify every record of an input file against named queries
    #[command(alias = "c")]
    Check {
        /// Query names, loaded from <query_dir>/<name>.txt
        names: Vec<String>,

        /// Query names as a comma-separated list (added to NAMES)
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Input file (default: first file in the configured input directory)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (default: <results_dir>/<stem>_result.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of worker threads
        #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
        workers: Option<u16>,

        /// Keep the text column in the output
        #[arg(long)]
        keep_text: bool,
    },

    /// Parse a query and print its condition tree
    #[command(alias = "p")]
    Parse {
        /// Query expression
        expr: String,
    },

    /// Evaluate a query against a single text
    #[command(alias = "e")]
    Eval {
        /// Query expression
        expr: String,

        /// Text to match against
        text: String,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Supported shells for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Show config file path
    Path,
}
