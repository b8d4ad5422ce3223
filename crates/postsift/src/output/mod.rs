//! Output formatting utilities for the sift CLI.
//!
//! - [`check`] - Batch run summaries
//! - [`query`] - Condition trees and single-text evaluations
//! - [`helpers`] - Common formatting utilities

mod check;
pub mod helpers;
mod query;

pub use check::{format_check_json, format_check_table};
pub use query::{format_eval_json, format_eval_text, format_tree_json, format_tree_text};
