//! Synthetic user data for load-testing.
//!
//! Fills a SQLite database with fake users in fixed-size batches inside a
//! single transaction, seeds the `UserStats` aggregate, then builds
//! secondary indexes and the triggers that keep `UserStats` current.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use user_seeder::prelude::*;
//!
//! let config = SeedConfig::new("data/App.db")
//!     .with_record_count(20_000)
//!     .with_seed(12345);
//! let report = run(&config).await?;
//! assert_eq!(report.records_inserted, 20_000);
//! ```

pub mod config;
pub mod db;
pub mod generators;
pub mod models;
pub mod runner;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::SeedConfig;
    pub use crate::db::{LoadSummary, SeedError, Seeder};
    pub use crate::generators::{
        GeneratedUser, RandomUsers, RecordSource, UserGenConfig, UserGenerator,
    };
    pub use crate::models::{Status, SubscriptionType};
    pub use crate::runner::{SeedReport, run, run_with_source};
}
