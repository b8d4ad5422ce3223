//! Eval command implementation.
//!
//! Evaluates one query against one text and reports the verdict together
//! with the word positions that satisfied it.

use postsift_query::query::{evaluate, word_indices};
use postsift_query::{NormalizedText, QueryParser, Verdict};

use super::{CommandContext, Result};
use crate::output::{format_eval_json, format_eval_text};

/// Result of evaluating a query against a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalResult {
    /// The query as given.
    pub query: String,
    /// The canonical form of the parsed query.
    pub canonical: String,
    /// Whether the text matches.
    pub verdict: Verdict,
    /// Positions of the matched words in the normalized text.
    pub word_indices: Vec<usize>,
    /// The normalized words at `word_indices`.
    pub words: Vec<String>,
}

/// Parses `expr` and evaluates it against `text`.
pub fn eval(expr: &str, text: &str) -> Result<EvalResult> {
    let tree = QueryParser::parse(expr)?;
    let normalized = NormalizedText::new(text);
    let verdict = Verdict::from(evaluate(&tree, &normalized));

    let words: Vec<&str> = normalized.as_str().split(' ').filter(|w| !w.is_empty()).collect();
    let (word_indices, words): (Vec<usize>, Vec<String>) = if verdict.is_match() {
        word_indices(&tree, normalized.as_str())
            .into_iter()
            .filter_map(|i| words.get(i).map(|w| (i, w.to_string())))
            .unzip()
    } else {
        (Vec::new(), Vec::new())
    };

    Ok(EvalResult {
        query: expr.to_string(),
        canonical: tree.to_string(),
        verdict,
        word_indices,
        words,
    })
}

/// Executes the eval command.
pub fn execute(ctx: &CommandContext, expr: &str, text: &str) -> Result<()> {
    let result = eval(expr, text)?;

    if ctx.json_output {
        println!("{}", format_eval_json(&result)?);
    } else if !ctx.quiet {
        print!("{}", format_eval_text(&result, ctx.verbose, ctx.use_colors));
    }

    Ok(())
}
