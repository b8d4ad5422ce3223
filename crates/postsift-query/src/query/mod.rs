//! Boolean query parser and evaluator.
//!
//! This module parses search expressions into condition trees and evaluates
//! them against free text with whole-word and proximity semantics.
//!
//! # Supported Syntax
//!
//! ## Terms
//! - `camera` - The word, matched as a whole word
//! - `cam?ra` - `?` stands for exactly one character
//! - `cam*` - `*` stands for any run of non-space characters
//! - `"galaxy s23"` - A quoted phrase, matched as consecutive words
//!
//! ## Operators
//! - `a OR b` - Either term
//! - `a AND b` - Both terms
//! - `a NOT b` - `a` without `b` (binary exclusion)
//! - `a NEAR/3 b` - Both terms, at most 3 words apart
//! - `()` - Grouping
//!
//! Keywords are case-insensitive. Each parenthesis level uses one operator
//! kind; the first found in the order `OR`, `AND`, `NOT`, `NEAR` splits the
//! level and any other keyword at that level is an ordinary word.
//!
//! # Example
//!
//! ```
//! use postsift_query::query::{evaluate, NormalizedText, QueryParser};
//!
//! let tree = QueryParser::parse("(camera OR lens) AND \"galaxy s23\"").unwrap();
//!
//! assert!(evaluate(&tree, &NormalizedText::new("My Galaxy S23 camera is great!")));
//! assert!(!evaluate(&tree, &NormalizedText::new("My Galaxy S22 camera")));
//! ```

mod ast;
mod error;
mod evaluator;
mod normalize;
mod parser;
mod pattern;

pub use ast::{ConditionNode, OperatorKind};
pub use error::{QueryError, QueryResult};
pub use evaluator::{evaluate, evaluate_str, near_span, word_indices, QueryEvaluator};
pub use normalize::{
    normalize_query, replace_typographic, NormalizedText, JOIN_TOKEN, QUOTE_TOKEN,
};
pub use parser::QueryParser;
pub use pattern::{compile_word, Pattern};
