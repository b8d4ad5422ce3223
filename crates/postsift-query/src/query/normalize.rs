//! Text normalization shared by queries and records.
//!
//! Both sides of a match go through the same typographic cleanup so that a
//! query typed with curly quotes or decomposed accents still finds text that
//! uses the plain forms, and vice versa.

use std::fmt;

use unicode_normalization::UnicodeNormalization;

/// Private-use character that joins the words of a quoted phrase.
///
/// Quoted phrases are rewritten with this token in place of their spaces so
/// the parser sees them as one term. The pattern compiler turns it back into a
/// space.
pub const JOIN_TOKEN: char = '\u{E000}';

/// Stands for a literal `(` inside a quoted phrase.
pub(crate) const OPEN_TOKEN: char = '\u{E001}';

/// Stands for a literal `)` inside a quoted phrase.
pub(crate) const CLOSE_TOKEN: char = '\u{E002}';

/// Marks the start of a quoted span.
///
/// A marked word is never an operator keyword or a group reference, so
/// `"or"` is the literal word `or`. The pattern compiler drops the marker.
pub const QUOTE_TOKEN: char = '\u{E003}';

/// Typographic characters replaced before matching.
const TYPOGRAPHIC: &[(char, char)] = &[
    ('\u{201C}', '"'),
    ('\u{201D}', '"'),
    ('\u{2018}', '\''),
    ('\u{2019}', '\''),
];

/// Record text prepared for evaluation.
///
/// Lower-cased, whitespace-collapsed, typographically normalized and padded
/// with exactly one space on each side, so every word is space-delimited.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedText(String);

impl NormalizedText {
    /// Normalizes raw record text.
    pub fn new(raw: &str) -> Self {
        let cleaned = replace_typographic(raw).to_lowercase();
        let mut text = String::with_capacity(cleaned.len() + 2);
        text.push(' ');
        for word in cleaned.split_whitespace() {
            text.push_str(word);
            text.push(' ');
        }
        if text.len() == 1 {
            text.push(' ');
        }
        Self(text)
    }

    /// Returns the normalized text, including its padding.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Prepares a raw query for parsing.
///
/// Collapses whitespace, applies the typographic normalization and replaces
/// each non-empty quoted span with [`QUOTE_TOKEN`] followed by its content,
/// spaces joined by [`JOIN_TOKEN`]. Parentheses inside quotes are shielded
/// from grouping and match literally. An unterminated quote extends to the
/// end of the query.
///
/// ```
/// use postsift_query::query::{normalize_query, JOIN_TOKEN, QUOTE_TOKEN};
///
/// let query = normalize_query(r#" d  "big camera" OR c "#);
/// assert_eq!(query, format!("d {QUOTE_TOKEN}big{JOIN_TOKEN}camera OR c"));
/// ```
pub fn normalize_query(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    join_quoted(&replace_typographic(&collapsed))
}

/// Replaces curly quotes and composes decomposed characters.
pub fn replace_typographic(text: &str) -> String {
    text.chars()
        .map(|c| {
            TYPOGRAPHIC
                .iter()
                .find(|(from, _)| *from == c)
                .map_or(c, |(_, to)| *to)
        })
        .nfc()
        .collect()
}

fn join_quoted(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    let mut in_quote = false;
    let mut opened = false;
    for c in query.chars() {
        if c == '"' {
            in_quote = !in_quote;
            opened = in_quote;
            continue;
        }
        if opened {
            out.push(QUOTE_TOKEN);
            opened = false;
        }
        match c {
            ' ' if in_quote => out.push(JOIN_TOKEN),
            '(' if in_quote => out.push(OPEN_TOKEN),
            ')' if in_quote => out.push(CLOSE_TOKEN),
            _ => out.push(c),
        }
    }
    out
}
