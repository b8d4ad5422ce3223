//! Check command implementation.
//!
//! Classifies every record of an input file against named queries and writes
//! a result table with one Y/N column per query.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use postsift_query::{QuerySet, RecordSource, Selector};
use tracing::info;

use super::config::{load_config, Config};
use super::{CommandContext, CommandError, Result};
use crate::output::{format_check_json, format_check_table};
use crate::records::{first_file, result_path, write_results, DelimitedSource, ResultLayout};

/// Options for the check command.
#[derive(Debug, Default)]
pub struct CheckOptions {
    /// Query names, in column order.
    pub names: Vec<String>,
    /// Input file override.
    pub input: Option<PathBuf>,
    /// Output file override.
    pub output: Option<PathBuf>,
    /// Worker count override.
    pub workers: Option<usize>,
    /// Keep the text column in the output.
    pub keep_text: bool,
}

/// Match count for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCount {
    pub name: String,
    pub matches: usize,
}

/// Outcome of a check run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows: usize,
    pub workers: usize,
    pub queries: Vec<QueryCount>,
}

/// Reads `<query_dir>/<name>.txt` for each name and parses them in order.
pub fn load_queries(query_dir: &Path, names: &[String]) -> Result<QuerySet> {
    if names.is_empty() {
        return Err(CommandError::Input("No query names given".to_string()));
    }

    let mut seen = HashSet::new();
    let mut sources = Vec::with_capacity(names.len());
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(CommandError::Input(format!("Query '{name}' given more than once")));
        }
        let path = query_dir.join(format!("{name}.txt"));
        let query = fs::read_to_string(&path).map_err(|e| {
            CommandError::Input(format!("Cannot read query '{name}' at {}: {e}", path.display()))
        })?;
        sources.push((name.clone(), query.trim().to_string()));
    }

    Ok(QuerySet::parse_all(sources)?)
}

/// Runs a check with the given configuration.
pub fn run_check(config: &Config, opts: &CheckOptions) -> Result<CheckSummary> {
    let queries = load_queries(&config.paths.query_dir, &opts.names)?;

    let input = match &opts.input {
        Some(path) => path.clone(),
        None => first_file(&config.paths.input_dir)?,
    };
    let output = opts
        .output
        .clone()
        .unwrap_or_else(|| result_path(&config.paths.results_dir, &input));

    let mut source = DelimitedSource::open(&input)?;
    let records = source.read_records(None)?;

    let selector = Selector::new(queries, config.run.selector_options(opts.workers))
        .map_err(|e| CommandError::Io(io::Error::other(e)))?;
    let workers = selector.workers();
    info!(input = %input.display(), records = records.len(), workers, "classifying records");
    let rows = selector.select(&records);

    let queries = selector.queries();
    let layout = ResultLayout {
        text_header: source.text_header(),
        field_headers: source.field_headers().collect(),
        query_names: queries.names().collect(),
        keep_text: opts.keep_text || config.run.keep_text,
    };
    write_results(&output, &layout, &records, &rows, config.run.backup_count)?;

    let counts = queries
        .names()
        .enumerate()
        .map(|(i, name)| QueryCount {
            name: name.to_string(),
            matches: rows
                .iter()
                .filter(|row| row.verdicts().nth(i).is_some_and(|v| v.is_match()))
                .count(),
        })
        .collect();

    Ok(CheckSummary {
        input,
        output,
        rows: rows.len(),
        workers,
        queries: counts,
    })
}

/// Executes the check command.
pub fn execute(ctx: &CommandContext, opts: &CheckOptions) -> Result<()> {
    let config = load_config()?;
    let summary = run_check(&config, opts)?;

    if ctx.json_output {
        println!("{}", format_check_json(&summary)?);
    } else if !ctx.quiet {
        print!("{}", format_check_table(&summary, ctx.use_colors));
    }

    Ok(())
}
