//! Condition tree and evaluation output formatting.

use owo_colors::OwoColorize;
use postsift_query::ConditionNode;
use serde::Serialize;

use crate::commands::eval::EvalResult;

use super::helpers::format_verdict;

/// JSON output structure for a parsed query.
#[derive(Serialize)]
pub struct TreeOutput<'a> {
    pub query: &'a str,
    pub canonical: String,
    pub tree: &'a ConditionNode,
}

/// Formats a parsed query as JSON.
pub fn format_tree_json(query: &str, tree: &ConditionNode) -> Result<String, serde_json::Error> {
    let output = TreeOutput {
        query,
        canonical: tree.to_string(),
        tree,
    };
    serde_json::to_string_pretty(&output)
}

/// Formats a parsed query as its canonical form, followed by an indented
/// outline when `outline` is set.
pub fn format_tree_text(tree: &ConditionNode, outline: bool, use_colors: bool) -> String {
    let mut output = format!("{tree}\n");
    if outline {
        output.push('\n');
        push_outline(&mut output, tree, 0, use_colors);
    }
    output
}

fn push_outline(output: &mut String, node: &ConditionNode, depth: usize, use_colors: bool) {
    let indent = "  ".repeat(depth);
    match node.kind() {
        Some(kind) => {
            let label = match node.distance() {
                Some(distance) => format!("{kind}/{distance}"),
                None => kind.to_string(),
            };
            if use_colors {
                output.push_str(&format!("{indent}{}\n", label.cyan().bold()));
            } else {
                output.push_str(&format!("{indent}{label}\n"));
            }
            for operand in node.operands() {
                push_outline(output, operand, depth + 1, use_colors);
            }
        }
        None => output.push_str(&format!("{indent}{node}\n")),
    }
}

/// JSON output structure for an evaluation.
#[derive(Serialize)]
pub struct EvalOutput<'a> {
    pub query: &'a str,
    pub canonical: &'a str,
    pub verdict: char,
    pub word_indices: &'a [usize],
    pub words: &'a [String],
}

/// Formats an evaluation as JSON.
pub fn format_eval_json(result: &EvalResult) -> Result<String, serde_json::Error> {
    let output = EvalOutput {
        query: &result.query,
        canonical: &result.canonical,
        verdict: result.verdict.as_char(),
        word_indices: &result.word_indices,
        words: &result.words,
    };
    serde_json::to_string_pretty(&output)
}

/// Formats an evaluation as the verdict letter, followed by the matched
/// words when `verbose` is set.
pub fn format_eval_text(result: &EvalResult, verbose: bool, use_colors: bool) -> String {
    let mut output = format!("{}\n", format_verdict(result.verdict, use_colors));
    if verbose && !result.words.is_empty() {
        let words: Vec<String> = result
            .word_indices
            .iter()
            .zip(&result.words)
            .map(|(index, word)| format!("{index}:{word}"))
            .collect();
        output.push_str(&format!("Matched words: {}\n", words.join(" ")));
    }
    output
}
