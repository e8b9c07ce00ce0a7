//! Database integration for seeding.
//!
//! The [`Seeder`] owns the run's single SQLite connection and drives the
//! schema setup, the transactional bulk load, and the post-load indexes and
//! triggers. [`stats`] holds read-side queries over the result.

pub mod schema;
mod seeder;
pub mod stats;

pub use seeder::{LoadSummary, SeedError, Seeder};
