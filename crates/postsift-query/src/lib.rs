//! Boolean full-text query engine for classifying text records.
//!
//! Queries combine words, wildcards and quoted phrases with `OR`, `AND`,
//! `NOT` and `NEAR/n`, grouped by parentheses. A [`QuerySet`] holds named
//! queries; [`check`] produces one Y/N [`Verdict`] per query for a text, and
//! [`Selector`] does the same for whole batches on a worker pool.
//!
//! ```
//! use postsift_query::{check, QuerySet, Verdict};
//!
//! let queries = QuerySet::parse_all([
//!     ("camera", "camera* OR lens"),
//!     ("galaxy", "\"galaxy s23\" NEAR/3 camera*"),
//! ])
//! .unwrap();
//!
//! let row = check("The Galaxy S23 has three cameras", &queries);
//! assert_eq!(row.get("camera"), Some(Verdict::Match));
//! assert_eq!(row.get("galaxy"), Some(Verdict::Match));
//! ```

pub mod checker;
pub mod query;
pub mod selector;
pub mod source;

pub use checker::{check, CheckRow, QueryChecker, QuerySet, QuerySetError, Verdict};
pub use query::{ConditionNode, NormalizedText, QueryError, QueryParser};
pub use selector::{Selector, SelectorOptions, DEFAULT_CHUNK_LEN, DEFAULT_CPU_DIVIDE_COUNT};
pub use source::{Record, RecordSource};
