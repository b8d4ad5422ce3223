//! Condition tree for parsed query expressions.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::pattern::Pattern;

/// The operator of a non-leaf node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperatorKind {
    /// At least one operand matches.
    Or,
    /// Every operand matches.
    And,
    /// The first operand matches and the second does not.
    Not,
    /// Both operands match within a word distance of each other.
    Near,
}

impl OperatorKind {
    /// Returns the keyword used in query text.
    pub fn keyword(self) -> &'static str {
        match self {
            OperatorKind::Or => "OR",
            OperatorKind::And => "AND",
            OperatorKind::Not => "NOT",
            OperatorKind::Near => "NEAR",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A node of a parsed query.
///
/// A tree is fully owned and immutable once built, so it can be shared
/// read-only across threads and evaluated against any number of texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionNode {
    /// A single compiled word or phrase.
    Leaf(Pattern),

    /// Matches if any operand matches.
    Or(Vec<ConditionNode>),

    /// Matches if every operand matches.
    And(Vec<ConditionNode>),

    /// Binary exclusion: the first operand matches and the second does not.
    Not(Box<ConditionNode>, Box<ConditionNode>),

    /// Both operands match within `distance` words of each other.
    Near {
        /// First operand.
        left: Box<ConditionNode>,
        /// Second operand.
        right: Box<ConditionNode>,
        /// Maximum number of words allowed between the two matches.
        distance: usize,
    },

    /// Word indices that are already known to match.
    Resolved(BTreeSet<usize>),
}

impl ConditionNode {
    /// Creates a NOT node.
    pub fn not(include: ConditionNode, exclude: ConditionNode) -> Self {
        ConditionNode::Not(Box::new(include), Box::new(exclude))
    }

    /// Creates a NEAR node.
    pub fn near(left: ConditionNode, right: ConditionNode, distance: usize) -> Self {
        ConditionNode::Near {
            left: Box::new(left),
            right: Box::new(right),
            distance,
        }
    }

    /// Returns the operator of this node, or `None` for leaves and resolved
    /// index sets.
    pub fn kind(&self) -> Option<OperatorKind> {
        match self {
            ConditionNode::Or(_) => Some(OperatorKind::Or),
            ConditionNode::And(_) => Some(OperatorKind::And),
            ConditionNode::Not(..) => Some(OperatorKind::Not),
            ConditionNode::Near { .. } => Some(OperatorKind::Near),
            ConditionNode::Leaf(_) | ConditionNode::Resolved(_) => None,
        }
    }

    /// Returns the operands in order. Empty for leaves and resolved sets.
    pub fn operands(&self) -> Vec<&ConditionNode> {
        match self {
            ConditionNode::Or(ops) | ConditionNode::And(ops) => ops.iter().collect(),
            ConditionNode::Not(include, exclude) => vec![include.as_ref(), exclude.as_ref()],
            ConditionNode::Near { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            ConditionNode::Leaf(_) | ConditionNode::Resolved(_) => Vec::new(),
        }
    }

    /// Returns the NEAR distance, if this is a NEAR node.
    pub fn distance(&self) -> Option<usize> {
        match self {
            ConditionNode::Near { distance, .. } => Some(*distance),
            _ => None,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind().is_some() {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }

    fn fmt_joined(ops: &[ConditionNode], sep: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in ops.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            op.fmt_operand(f)?;
        }
        Ok(())
    }
}

/// Renders the node in query syntax, parenthesizing every nested operator.
impl fmt::Display for ConditionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionNode::Leaf(pattern) => write!(f, "{pattern}"),
            ConditionNode::Or(ops) => Self::fmt_joined(ops, " OR ", f),
            ConditionNode::And(ops) => Self::fmt_joined(ops, " AND ", f),
            ConditionNode::Not(include, exclude) => {
                include.fmt_operand(f)?;
                f.write_str(" NOT ")?;
                exclude.fmt_operand(f)
            }
            ConditionNode::Near {
                left,
                right,
                distance,
            } => {
                left.fmt_operand(f)?;
                write!(f, " NEAR/{distance} ")?;
                right.fmt_operand(f)
            }
            ConditionNode::Resolved(indices) => write!(f, "{indices:?}"),
        }
    }
}
