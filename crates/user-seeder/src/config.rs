//! Configuration types for seeding runs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Database file used when no path is given, relative to the working directory.
pub const DEFAULT_DATABASE_PATH: &str = "data/App.db";

/// Number of users requested when no count is given.
pub const DEFAULT_RECORD_COUNT: usize = 1_000_000;

/// Rows generated and inserted together.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Batches between progress log lines.
pub const PROGRESS_INTERVAL: usize = 10;

/// Number of full batches of `batch_size` that fit in `record_count`.
/// The remainder is dropped; a zero batch size yields no batches.
pub fn whole_batches(record_count: usize, batch_size: usize) -> usize {
    record_count.checked_div(batch_size).unwrap_or(0)
}

/// Configuration for a seeding run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// SQLite database file to populate. Created if missing.
    pub database_path: PathBuf,

    /// Number of users requested. Only whole batches are written, so
    /// `record_count % batch_size` users are dropped.
    pub record_count: usize,

    /// Batch size for database insertions.
    pub batch_size: usize,

    /// Seed for the random number generator. `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            record_count: DEFAULT_RECORD_COUNT,
            batch_size: DEFAULT_BATCH_SIZE,
            rng_seed: None,
        }
    }
}

impl SeedConfig {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            ..Self::default()
        }
    }

    pub fn with_record_count(mut self, count: usize) -> Self {
        self.record_count = count;
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Makes generated data reproducible across runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Number of full batches that will be written.
    ///
    /// Returns 0 for a zero batch size; the runner rejects that case before
    /// touching the database.
    pub fn total_batches(&self) -> usize {
        whole_batches(self.record_count, self.batch_size)
    }

    /// Number of rows that will actually be inserted.
    pub fn effective_record_count(&self) -> usize {
        self.total_batches() * self.batch_size
    }
}
