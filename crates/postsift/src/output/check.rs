//! Check run output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;

use crate::commands::check::CheckSummary;

use super::helpers::{format_percent, truncate_str};

/// JSON output structure for a check run.
#[derive(Serialize)]
pub struct CheckOutput<'a> {
    pub input: String,
    pub output: String,
    pub rows: usize,
    pub workers: usize,
    pub queries: Vec<QueryCountOutput<'a>>,
}

/// JSON output structure for one query's match count.
#[derive(Serialize)]
pub struct QueryCountOutput<'a> {
    pub name: &'a str,
    pub matches: usize,
}

/// Formats a check summary as JSON.
pub fn format_check_json(summary: &CheckSummary) -> Result<String, serde_json::Error> {
    let output = CheckOutput {
        input: summary.input.display().to_string(),
        output: summary.output.display().to_string(),
        rows: summary.rows,
        workers: summary.workers,
        queries: summary
            .queries
            .iter()
            .map(|q| QueryCountOutput {
                name: &q.name,
                matches: q.matches,
            })
            .collect(),
    };

    serde_json::to_string_pretty(&output)
}

/// Formats a check summary as a table.
pub fn format_check_table(summary: &CheckSummary, use_colors: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Checked {} rows from {} ({} workers)\n",
        summary.rows,
        summary.input.display(),
        summary.workers
    ));
    output.push_str(&format!("Wrote {}\n\n", summary.output.display()));

    let header = format!("{:<24} {:>8} {:>8}", "Query", "Matches", "Share");
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for query in &summary.queries {
        let matches = format!("{:>8}", query.matches);
        let matches = if use_colors && query.matches > 0 {
            matches.green().to_string()
        } else {
            matches
        };
        output.push_str(&format!(
            "{:<24} {} {:>8}\n",
            truncate_str(&query.name, 24),
            matches,
            format_percent(query.matches, summary.rows)
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::commands::check::QueryCount;

    fn summary() -> CheckSummary {
        CheckSummary {
            input: PathBuf::from("run/posts.csv"),
            output: PathBuf::from("results/posts_result.csv"),
            rows: 4,
            workers: 2,
            queries: vec![
                QueryCount {
                    name: "camera".to_string(),
                    matches: 3,
                },
                QueryCount {
                    name: "galaxy".to_string(),
                    matches: 0,
                },
            ],
        }
    }

    #[test]
    fn test_format_check_json() {
        let json: serde_json::Value =
            serde_json::from_str(&format_check_json(&summary()).unwrap()).unwrap();
        assert_eq!(json["rows"], 4);
        assert_eq!(json["output"], "results/posts_result.csv");
        assert_eq!(json["queries"][0]["name"], "camera");
        assert_eq!(json["queries"][0]["matches"], 3);
        assert_eq!(json["queries"][1]["matches"], 0);
    }

    #[test]
    fn test_format_check_table() {
        let table = format_check_table(&summary(), false);
        assert!(table.starts_with("Checked 4 rows from run/posts.csv (2 workers)\n"));
        assert!(table.contains("Wrote results/posts_result.csv"));
        assert!(table.contains("camera"));
        assert!(table.contains("75.0%"));
        assert!(table.contains("0.0%"));
    }
}
