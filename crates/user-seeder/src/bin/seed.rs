//! Default seed script - fills a SQLite database with synthetic users
//!
//! Run with:
//! ```
//! cargo run -p user-seeder --bin seed -- [DATABASE_PATH] [NUM_RECORDS]
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use user_seeder::config::{DEFAULT_BATCH_SIZE, DEFAULT_DATABASE_PATH, DEFAULT_RECORD_COUNT};
use user_seeder::prelude::*;

/// Populate a SQLite database with synthetic users for load testing.
#[derive(Parser, Debug)]
#[command(name = "seed", version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    #[arg(default_value = DEFAULT_DATABASE_PATH)]
    database: PathBuf,

    /// Number of users to generate (rounded down to whole batches)
    #[arg(default_value_t = DEFAULT_RECORD_COUNT)]
    num_records: usize,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = SeedConfig::new(args.database)
        .with_record_count(args.num_records)
        .with_batch_size(DEFAULT_BATCH_SIZE);

    tracing::info!("Seeding {}", config.database_path.display());

    let report = run(&config).await?;

    tracing::info!("Seed completed!");
    tracing::info!("  Batches: {}", report.batches);
    tracing::info!("  Users inserted: {}", report.records_inserted);
    tracing::info!("  UserStats.TotalUsers: {}", report.seeded_total);

    Ok(())
}
