//! Entity generators for seed data.
//!
//! - [`UserGenerator`]: synthetic users with dates, statuses, points and tiers
//! - [`RecordSource`]: the seam the batch loader pulls rows from

pub mod user;

pub use user::{
    GeneratedUser, RandomUsers, RecordSource, TIMESTAMP_FORMAT, UserGenConfig, UserGenerator,
    format_timestamp, parse_timestamp,
};
