//! Parallel classification of record batches.
//!
//! Records are split into disjoint chunks that run on a dedicated rayon pool.
//! Each chunk only reads the shared [`QuerySet`], and results come back in
//! input order regardless of how the chunks were scheduled.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use tracing::debug;

use crate::checker::{CheckRow, QueryChecker, QuerySet};

/// Default number of records per chunk for large batches.
pub const DEFAULT_CHUNK_LEN: usize = 100;

/// Default divisor applied to the CPU count to size the pool.
pub const DEFAULT_CPU_DIVIDE_COUNT: usize = 2;

/// Minimum number of workers.
const MIN_WORKERS: usize = 2;

/// Options for a [`Selector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorOptions {
    /// Explicit worker count. Derived from the CPU count when `None`.
    pub workers: Option<usize>,
    /// The CPU count is divided by this to derive the worker count.
    pub cpu_divide_count: usize,
    /// Records per chunk once a batch is large enough to need more chunks
    /// than workers.
    pub chunk_len: usize,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        Self {
            workers: None,
            cpu_divide_count: DEFAULT_CPU_DIVIDE_COUNT,
            chunk_len: DEFAULT_CHUNK_LEN,
        }
    }
}

impl SelectorOptions {
    /// Returns the number of workers to run.
    pub fn worker_count(&self) -> usize {
        match self.workers {
            Some(workers) => workers.max(1),
            None => {
                let cpus = std::thread::available_parallelism().map_or(1, |n| n.get());
                (cpus / self.cpu_divide_count.max(1)).max(MIN_WORKERS)
            }
        }
    }

    /// Returns the chunk length for a batch of `total` records.
    ///
    /// Large batches are cut into `chunk_len` pieces; smaller ones are spread
    /// evenly over the workers.
    pub fn chunk_len_for(&self, total: usize, workers: usize) -> usize {
        let chunk_len = self.chunk_len.max(1);
        if total > chunk_len.saturating_mul(workers) {
            chunk_len
        } else {
            total.div_ceil(workers.max(1)).max(1)
        }
    }
}

/// Classifies batches of records against a [`QuerySet`] in parallel.
pub struct Selector {
    queries: QuerySet,
    options: SelectorOptions,
    pool: ThreadPool,
}

impl Selector {
    /// Creates a selector with its own thread pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread pool cannot be created.
    pub fn new(queries: QuerySet, options: SelectorOptions) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(options.worker_count())
            .thread_name(|i| format!("postsift-worker-{i}"))
            .build()?;
        Ok(Self {
            queries,
            options,
            pool,
        })
    }

    /// Returns the queries this selector applies.
    pub fn queries(&self) -> &QuerySet {
        &self.queries
    }

    /// Returns the number of worker threads.
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Checks every record, returning one row per record in input order.
    pub fn select<T>(&self, records: &[T]) -> Vec<CheckRow>
    where
        T: AsRef<str> + Sync,
    {
        if records.is_empty() {
            return Vec::new();
        }

        let workers = self.workers();
        let chunk_len = self.options.chunk_len_for(records.len(), workers);
        debug!(
            total = records.len(),
            workers,
            chunk_len,
            chunks = records.len().div_ceil(chunk_len),
            "selecting records"
        );

        let checker = QueryChecker::new(&self.queries);
        self.pool.install(|| {
            records
                .par_chunks(chunk_len)
                .flat_map_iter(|chunk| chunk.iter().map(|record| checker.check(record.as_ref())))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{check, Verdict};

    fn queries() -> QuerySet {
        QuerySet::parse_all([("even", "even"), ("odd", "odd NOT even")]).unwrap()
    }

    fn records(n: usize) -> Vec<String> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    format!("record {i} is even")
                } else {
                    format!("record {i} is odd")
                }
            })
            .collect()
    }

    #[test]
    fn test_chunk_len_small_batch_spreads_over_workers() {
        let options = SelectorOptions::default();
        assert_eq!(options.chunk_len_for(10, 4), 3);
        assert_eq!(options.chunk_len_for(1, 4), 1);
        assert_eq!(options.chunk_len_for(400, 4), 100);
    }

    #[test]
    fn test_chunk_len_large_batch_uses_fixed_chunks() {
        let options = SelectorOptions {
            chunk_len: 10,
            ..SelectorOptions::default()
        };
        assert_eq!(options.chunk_len_for(1000, 4), 10);
    }

    #[test]
    fn test_worker_count() {
        let explicit = SelectorOptions {
            workers: Some(3),
            ..SelectorOptions::default()
        };
        assert_eq!(explicit.worker_count(), 3);
        assert!(SelectorOptions::default().worker_count() >= MIN_WORKERS);
    }

    #[test]
    fn test_select_preserves_input_order() {
        let records = records(1003);
        for chunk_len in [1, 7, 100, 5000] {
            let options = SelectorOptions {
                workers: Some(4),
                chunk_len,
                ..SelectorOptions::default()
            };
            let selector = Selector::new(queries(), options).unwrap();
            let rows = selector.select(&records);
            assert_eq!(rows.len(), records.len());
            for (i, row) in rows.iter().enumerate() {
                let expected = Verdict::from(i % 2 == 0);
                assert_eq!(row.get("even"), Some(expected), "record {i}, chunk {chunk_len}");
                assert_eq!(row.get("odd"), Some(Verdict::from(i % 2 == 1)));
            }
        }
    }

    #[test]
    fn test_select_matches_sequential_check() {
        let records = records(57);
        let selector = Selector::new(queries(), SelectorOptions::default()).unwrap();
        let parallel = selector.select(&records);
        let sequential: Vec<_> = records.iter().map(|r| check(r, selector.queries())).collect();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_select_empty_batch() {
        let selector = Selector::new(queries(), SelectorOptions::default()).unwrap();
        let records: Vec<&str> = Vec::new();
        assert!(selector.select(&records).is_empty());
    }
}
