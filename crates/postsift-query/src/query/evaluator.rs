//! Evaluation of condition trees against normalized text.
//!
//! Evaluation is pure: the same tree and text always give the same answer,
//! and nothing is cached between calls.
//!
//! # Example
//!
//! ```
//! use postsift_query::query::{NormalizedText, QueryEvaluator, QueryParser};
//!
//! let tree = QueryParser::parse("camera NEAR/2 galaxy").unwrap();
//! let text = NormalizedText::new("The Galaxy has a great camera");
//!
//! let evaluator = QueryEvaluator::new(&tree);
//! assert!(!evaluator.matches(&text));
//! assert!(evaluator.matches(&NormalizedText::new("Galaxy with camera")));
//! ```

use std::collections::BTreeSet;

use super::ast::ConditionNode;
use super::normalize::NormalizedText;

/// Evaluates a parsed condition tree against texts.
#[derive(Debug, Clone, Copy)]
pub struct QueryEvaluator<'a> {
    node: &'a ConditionNode,
}

impl<'a> QueryEvaluator<'a> {
    /// Creates a new evaluator for `node`.
    pub fn new(node: &'a ConditionNode) -> Self {
        Self { node }
    }

    /// Returns true if the text matches the tree.
    pub fn matches(&self, text: &NormalizedText) -> bool {
        evaluate(self.node, text)
    }

    /// Returns the word indices the tree matched in `text`.
    pub fn word_indices(&self, text: &NormalizedText) -> BTreeSet<usize> {
        word_indices(self.node, text.as_str())
    }
}

/// Returns true if `text` matches `node`.
pub fn evaluate(node: &ConditionNode, text: &NormalizedText) -> bool {
    evaluate_str(node, text.as_str())
}

/// Evaluates against text that is already lower-cased and space-padded.
pub fn evaluate_str(node: &ConditionNode, text: &str) -> bool {
    match node {
        ConditionNode::Leaf(pattern) => pattern.is_match(text),
        ConditionNode::Or(ops) => ops.iter().any(|op| evaluate_str(op, text)),
        ConditionNode::And(ops) => ops.iter().all(|op| evaluate_str(op, text)),
        ConditionNode::Not(include, exclude) => {
            evaluate_str(include, text) && !evaluate_str(exclude, text)
        }
        ConditionNode::Near {
            left,
            right,
            distance,
        } => near_pair_exists(left, right, *distance, text),
        ConditionNode::Resolved(indices) => !indices.is_empty(),
    }
}

/// Computes the word indices covered by `node` in `text`.
///
/// Leaves report the words of every match. `OR` takes the union, `AND` the
/// union only when every operand has a match, `NOT` the first operand's
/// indices when the second does not match, and `NEAR` its [`near_span`].
pub fn word_indices(node: &ConditionNode, text: &str) -> BTreeSet<usize> {
    match node {
        ConditionNode::Leaf(pattern) => pattern.find_word_indices(text).into_iter().collect(),
        ConditionNode::Resolved(indices) => indices.clone(),
        ConditionNode::Or(ops) => ops.iter().flat_map(|op| word_indices(op, text)).collect(),
        ConditionNode::And(ops) => {
            let mut all = BTreeSet::new();
            for op in ops {
                let indices = word_indices(op, text);
                if indices.is_empty() {
                    return BTreeSet::new();
                }
                all.extend(indices);
            }
            all
        }
        ConditionNode::Not(include, exclude) => {
            if evaluate_str(exclude, text) {
                BTreeSet::new()
            } else {
                word_indices(include, text)
            }
        }
        ConditionNode::Near {
            left,
            right,
            distance,
        } => near_span(left, right, *distance, text),
    }
}

/// Computes the word span matched by a NEAR condition.
///
/// For every index `i` of the left operand, in ascending order, the first
/// index `j` of the right operand with `i - distance - 1 <= j <= i + distance + 1`
/// contributes every word from `min(i, j)` to `max(i, j)`. An empty span means
/// the condition does not hold.
pub fn near_span(
    left: &ConditionNode,
    right: &ConditionNode,
    distance: usize,
    text: &str,
) -> BTreeSet<usize> {
    let left_indices = word_indices(left, text);
    let right_indices = word_indices(right, text);

    let mut span = BTreeSet::new();
    for &i in &left_indices {
        if let Some(&j) = right_indices.iter().find(|&&j| within(i, j, distance)) {
            span.extend(i.min(j)..=i.max(j));
        }
    }
    span
}

fn near_pair_exists(left: &ConditionNode, right: &ConditionNode, distance: usize, text: &str) -> bool {
    let left_indices = word_indices(left, text);
    if left_indices.is_empty() {
        return false;
    }
    let right_indices = word_indices(right, text);
    left_indices
        .iter()
        .any(|&i| right_indices.iter().any(|&j| within(i, j, distance)))
}

fn within(i: usize, j: usize, distance: usize) -> bool {
    i.abs_diff(j) <= distance.saturating_add(1)
}
