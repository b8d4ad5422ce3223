//! Error types for the query parser and pattern compiler.

use thiserror::Error;

/// A specialized Result type for query parsing operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that can occur while parsing a query expression.
///
/// Every variant except [`QueryError::Pattern`] describes a grammar violation
/// (see [`QueryError::is_invalid_query`]). Evaluation never fails, so these are
/// the only errors a query can produce.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The query expression is empty.
    #[error("query expression is empty")]
    EmptyExpression,

    /// A parenthesis has no matching counterpart.
    #[error("unbalanced parenthesis at position {position}")]
    UnbalancedParenthesis {
        /// Byte offset of the offending parenthesis in the working query.
        position: usize,
    },

    /// An operator has nothing on one of its sides.
    #[error("{operator} is missing an operand")]
    EmptyOperand {
        /// The operator keyword.
        operator: &'static str,
    },

    /// A binary operator was given the wrong number of operands.
    #[error("{operator} takes exactly {expected} operands, found {found}")]
    OperandCount {
        /// The operator keyword.
        operator: &'static str,
        /// The required operand count.
        expected: usize,
        /// The operand count in the query.
        found: usize,
    },

    /// A `NEAR` keyword without a `/<distance>` suffix.
    #[error("NEAR requires a word distance (NEAR/<n>), found '{token}'")]
    MissingNearDistance {
        /// The malformed separator text.
        token: String,
    },

    /// A group reference that does not resolve to a parenthesized expression.
    #[error("unresolvable group reference in '{token}'")]
    UnknownGroup {
        /// The operand containing the reference.
        token: String,
    },

    /// A literal term could not be compiled into a pattern.
    #[error("cannot compile term '{term}': {message}")]
    Pattern {
        /// The term as written in the query.
        term: String,
        /// The underlying regex error.
        message: String,
    },
}

impl QueryError {
    /// Returns true for grammar violations, false for pattern compile failures.
    pub fn is_invalid_query(&self) -> bool {
        !matches!(self, QueryError::Pattern { .. })
    }

    /// Creates an operand count error for a binary operator.
    pub fn operand_count(operator: &'static str, found: usize) -> Self {
        QueryError::OperandCount {
            operator,
            expected: 2,
            found,
        }
    }

    /// Creates a missing NEAR distance error.
    pub fn missing_near_distance(token: impl Into<String>) -> Self {
        QueryError::MissingNearDistance {
            token: token.into(),
        }
    }

    /// Creates an unknown group error.
    pub fn unknown_group(token: impl Into<String>) -> Self {
        QueryError::UnknownGroup {
            token: token.into(),
        }
    }

    /// Creates a pattern compile error.
    pub fn pattern(term: impl Into<String>, err: &regex::Error) -> Self {
        QueryError::Pattern {
            term: term.into(),
            message: err.to_string(),
        }
    }
}
