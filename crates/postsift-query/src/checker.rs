//! Batch checking of one text against many named queries.

use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::query::{evaluate, ConditionNode, NormalizedText, QueryError, QueryParser};

/// The outcome of evaluating one query against one text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The text matches the query.
    Match,
    /// The text does not match the query.
    NoMatch,
}

impl Verdict {
    /// Returns `'Y'` for a match and `'N'` otherwise.
    pub fn as_char(self) -> char {
        match self {
            Verdict::Match => 'Y',
            Verdict::NoMatch => 'N',
        }
    }

    /// Returns true for [`Verdict::Match`].
    pub fn is_match(self) -> bool {
        self == Verdict::Match
    }
}

impl From<bool> for Verdict {
    fn from(matched: bool) -> Self {
        if matched {
            Verdict::Match
        } else {
            Verdict::NoMatch
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.as_char())
    }
}

/// Errors from building a [`QuerySet`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QuerySetError {
    /// A query failed to parse.
    #[error("query '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: QueryError,
    },

    /// Two queries share a name.
    #[error("query '{name}' given more than once")]
    DuplicateName { name: String },
}

impl QuerySetError {
    /// Returns the name of the offending query.
    pub fn name(&self) -> &str {
        match self {
            QuerySetError::Parse { name, .. } | QuerySetError::DuplicateName { name } => name,
        }
    }
}

/// An ordered collection of named, parsed queries.
///
/// Names are the labels of the verdict columns and are unique. Trees are immutable once
/// added, so a set can be shared by reference across worker threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySet {
    entries: Vec<(String, ConditionNode)>,
}

impl QuerySet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses each `(name, query)` pair independently.
    ///
    /// # Errors
    ///
    /// Returns the first query that fails to parse or repeats an earlier
    /// name.
    pub fn parse_all<I, N, Q>(queries: I) -> Result<Self, QuerySetError>
    where
        I: IntoIterator<Item = (N, Q)>,
        N: Into<String>,
        Q: AsRef<str>,
    {
        let mut set = Self::new();
        for (name, query) in queries {
            let name = name.into();
            if set.get(&name).is_some() {
                return Err(QuerySetError::DuplicateName { name });
            }
            match QueryParser::parse(query.as_ref()) {
                Ok(tree) => set.entries.push((name, tree)),
                Err(source) => return Err(QuerySetError::Parse { name, source }),
            }
        }
        Ok(set)
    }

    /// Appends an already parsed query.
    ///
    /// # Errors
    ///
    /// Returns [`QuerySetError::DuplicateName`] if `name` is already present.
    pub fn push(
        &mut self,
        name: impl Into<String>,
        tree: ConditionNode,
    ) -> Result<(), QuerySetError> {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(QuerySetError::DuplicateName { name });
        }
        self.entries.push((name, tree));
        Ok(())
    }

    /// Returns the number of queries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the set holds no queries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the query names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the `(name, tree)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConditionNode)> {
        self.entries.iter().map(|(name, tree)| (name.as_str(), tree))
    }

    /// Returns the tree for `name`, if present.
    pub fn get(&self, name: &str) -> Option<&ConditionNode> {
        self.iter().find(|(n, _)| *n == name).map(|(_, tree)| tree)
    }
}

/// Verdicts for one text, in query order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRow {
    verdicts: Vec<(String, Verdict)>,
}

impl CheckRow {
    /// Returns the verdict for `name`, if present.
    pub fn get(&self, name: &str) -> Option<Verdict> {
        self.verdicts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, verdict)| *verdict)
    }

    /// Returns the `(name, verdict)` pairs in query order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Verdict)> {
        self.verdicts.iter().map(|(name, v)| (name.as_str(), *v))
    }

    /// Returns the verdicts in query order.
    pub fn verdicts(&self) -> impl Iterator<Item = Verdict> + '_ {
        self.verdicts.iter().map(|(_, v)| *v)
    }

    /// Returns the number of verdicts.
    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    /// Returns true if the row holds no verdicts.
    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }
}

/// Applies every query of a [`QuerySet`] to texts.
#[derive(Debug, Clone, Copy)]
pub struct QueryChecker<'a> {
    queries: &'a QuerySet,
}

impl<'a> QueryChecker<'a> {
    /// Creates a checker over `queries`.
    pub fn new(queries: &'a QuerySet) -> Self {
        Self { queries }
    }

    /// Normalizes `text` once and evaluates every query against it.
    pub fn check(&self, text: &str) -> CheckRow {
        self.check_normalized(&NormalizedText::new(text))
    }

    /// Evaluates every query against already normalized text.
    pub fn check_normalized(&self, text: &NormalizedText) -> CheckRow {
        let verdicts = self
            .queries
            .iter()
            .map(|(name, tree)| (name.to_string(), Verdict::from(evaluate(tree, text))))
            .collect();
        CheckRow { verdicts }
    }
}

/// Checks one text against every query of `queries`.
pub fn check(text: &str, queries: &QuerySet) -> CheckRow {
    QueryChecker::new(queries).check(text)
}
