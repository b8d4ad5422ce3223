//! Compilation of literal query terms into word-bounded patterns.

use std::fmt;

use regex::Regex;
use serde::{Serialize, Serializer};

use super::error::{QueryError, QueryResult};
use super::ast::OperatorKind;
use super::normalize::{CLOSE_TOKEN, JOIN_TOKEN, OPEN_TOKEN, QUOTE_TOKEN};

/// Characters accepted after a matched word.
const WORD_END: &str = "[?!,. ]";

/// A compiled word or phrase pattern.
///
/// Matches a term only at word boundaries of [`NormalizedText`], which is
/// always space-padded: the pattern starts with a space and ends with a space
/// or one of `?!,.`.
///
/// [`NormalizedText`]: super::NormalizedText
#[derive(Clone)]
pub struct Pattern {
    term: String,
    regex: Regex,
    words: usize,
}

/// Compiles a literal term into a [`Pattern`].
///
/// `.` and `+` match themselves, `?` matches exactly one character and `*`
/// matches any run of non-space characters. Words of a quoted phrase, joined
/// by [`JOIN_TOKEN`] during query normalization, are separated by a single
/// space again and the [`QUOTE_TOKEN`] marker is dropped. Other characters
/// are passed to the regex engine unchanged.
///
/// # Errors
///
/// Returns [`QueryError::Pattern`] if the resulting expression is not a valid
/// regex (for example an unknown escape such as `\q`).
///
/// # Example
///
/// ```
/// use postsift_query::query::compile_word;
///
/// let pattern = compile_word("a*").unwrap();
/// assert!(pattern.is_match(" aa bb cc "));
/// assert_eq!(pattern.as_regex(), " a[^ ]*[?!,. ]");
/// ```
pub fn compile_word(term: &str) -> QueryResult<Pattern> {
    let mut source = String::with_capacity(term.len() + 16);
    source.push(' ');
    for c in term.chars() {
        match c {
            '.' => source.push_str("[.]"),
            '+' => source.push_str("[+]"),
            '?' => source.push('.'),
            '*' => source.push_str("[^ ]*"),
            JOIN_TOKEN => source.push(' '),
            OPEN_TOKEN => source.push_str("\\("),
            CLOSE_TOKEN => source.push_str("\\)"),
            QUOTE_TOKEN => {}
            _ => source.push(c),
        }
    }
    source.push_str(WORD_END);

    let regex = Regex::new(&source).map_err(|e| QueryError::pattern(term, &e))?;
    let words = 1 + term.chars().filter(|c| *c == ' ' || *c == JOIN_TOKEN).count();

    Ok(Pattern {
        term: term.to_string(),
        regex,
        words,
    })
}

impl Pattern {
    /// Returns the term as written in the query, phrase joins restored.
    pub fn term(&self) -> String {
        self.term
            .chars()
            .filter(|c| *c != QUOTE_TOKEN)
            .map(|c| match c {
                JOIN_TOKEN => ' ',
                OPEN_TOKEN => '(',
                CLOSE_TOKEN => ')',
                _ => c,
            })
            .collect()
    }

    /// Returns true if the term must be quoted to parse back to itself.
    fn needs_quotes(&self) -> bool {
        if self.words > 1 || self.term.contains([OPEN_TOKEN, CLOSE_TOKEN, QUOTE_TOKEN]) {
            return true;
        }
        let term = self.term();
        term.contains(['(', ')'])
            || term.get(..4).is_some_and(|head| {
                head.eq_ignore_ascii_case("near") && (term.len() == 4 || term[4..].starts_with('/'))
            })
            || [OperatorKind::Or, OperatorKind::And, OperatorKind::Not]
                .iter()
                .any(|kind| term.eq_ignore_ascii_case(kind.keyword()))
    }

    /// Returns the compiled regex source.
    pub fn as_regex(&self) -> &str {
        self.regex.as_str()
    }

    /// Number of words the term spans.
    pub fn words(&self) -> usize {
        self.words
    }

    /// Returns true if the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Returns the word indices covered by every match in `text`.
    ///
    /// A match starting after `n` spaces covers words `n..n + words()`.
    /// A match ending in a space leaves that space to the next match, so
    /// adjacent occurrences are all counted.
    pub fn find_word_indices(&self, text: &str) -> Vec<usize> {
        let bytes = text.as_bytes();
        let mut indices = Vec::new();
        let mut scanned = 0;
        let mut spaces = 0;
        let mut start = 0;
        while let Some(m) = self.regex.find_at(text, start) {
            spaces += bytes[scanned..m.start()]
                .iter()
                .filter(|b| **b == b' ')
                .count();
            scanned = m.start();
            indices.extend(spaces..spaces + self.words);

            start = if bytes[m.end() - 1] == b' ' && m.end() - 1 > m.start() {
                m.end() - 1
            } else {
                m.end()
            };
            if start >= text.len() {
                break;
            }
        }
        indices
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.regex.as_str() == other.regex.as_str()
    }
}

impl Eq for Pattern {}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.regex.as_str()).finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.needs_quotes() {
            write!(f, "\"{}\"", self.term())
        } else {
            f.write_str(&self.term())
        }
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.term())
    }
}
