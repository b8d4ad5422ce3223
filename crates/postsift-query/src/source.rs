//! Record acquisition seam.
//!
//! Sources (files, feeds, scrapers) turn their own elements into [`Record`]s.
//! The query engine never depends on a concrete source.

use serde::Serialize;

/// One text record to classify.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    /// The text the queries are evaluated against.
    pub text: String,
    /// Other columns, carried through to the output unchanged.
    pub fields: Vec<String>,
}

impl Record {
    /// Creates a record with no extra fields.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fields: Vec::new(),
        }
    }

    /// Creates a record with extra fields.
    pub fn with_fields(text: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            text: text.into(),
            fields,
        }
    }
}

impl AsRef<str> for Record {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// A supplier of records.
///
/// `read_record` converts a single source element; `read_records` reads a run
/// of records, starting after `start` elements when given. Implementations
/// hold no state shared with other sources.
pub trait RecordSource {
    /// The raw element type of the source (a row, a post, ...).
    type Element;

    /// The error type of the source.
    type Error;

    /// Converts one element into a record.
    fn read_record(&self, element: &Self::Element) -> Result<Record, Self::Error>;

    /// Reads records, skipping the first `start` elements when given.
    fn read_records(&mut self, start: Option<usize>) -> Result<Vec<Record>, Self::Error>;
}
