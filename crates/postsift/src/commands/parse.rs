//! Parse command implementation.

use postsift_query::QueryParser;

use super::{CommandContext, Result};
use crate::output::{format_tree_json, format_tree_text};

/// Executes the parse command.
pub fn execute(ctx: &CommandContext, expr: &str) -> Result<()> {
    let tree = QueryParser::parse(expr)?;

    if ctx.json_output {
        println!("{}", format_tree_json(expr, &tree)?);
    } else if !ctx.quiet {
        print!("{}", format_tree_text(&tree, ctx.verbose, ctx.use_colors));
    }

    Ok(())
}
