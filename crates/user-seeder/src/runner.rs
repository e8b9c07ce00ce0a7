//! End-to-end seeding run: schema, bulk load, aggregate seed, commit,
//! indexes and triggers, in that order.

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use crate::config::SeedConfig;
use crate::db::{SeedError, Seeder};
use crate::generators::{RandomUsers, RecordSource, UserGenerator};

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct SeedReport {
    /// Number of batches written.
    pub batches: usize,
    /// Rows inserted into `User` by this run.
    pub records_inserted: usize,
    /// Value written to `UserStats.TotalUsers`.
    pub seeded_total: i64,
    /// Wall time from the start of generation to the last trigger.
    pub elapsed: Duration,
}

/// Seeds `config.database_path` with random users.
pub async fn run(config: &SeedConfig) -> Result<SeedReport, SeedError> {
    let rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut source = RandomUsers::new(UserGenerator::new(), rng);
    run_with_source(config, &mut source).await
}

/// Seeds `config.database_path` with rows pulled from `source`.
///
/// A zero batch size is rejected before the database file is touched.
/// The connection is closed on every path. If the run itself failed, its
/// error is returned and a close failure is only logged.
pub async fn run_with_source<S: RecordSource>(
    config: &SeedConfig,
    source: &mut S,
) -> Result<SeedReport, SeedError> {
    if config.batch_size == 0 {
        return Err(SeedError::InvalidBatchSize);
    }

    let mut seeder = Seeder::connect(&config.database_path)
        .await?
        .with_batch_size(config.batch_size);

    let outcome = seed(&mut seeder, config, source).await;

    match (seeder.close().await, outcome) {
        (Ok(()), outcome) => outcome,
        (Err(close_err), Ok(_)) => Err(close_err),
        (Err(close_err), Err(err)) => {
            warn!("Failed to close database after error: {}", close_err);
            Err(err)
        }
    }
}

async fn seed<S: RecordSource>(
    seeder: &mut Seeder,
    config: &SeedConfig,
    source: &mut S,
) -> Result<SeedReport, SeedError> {
    seeder.initialize_schema().await?;

    info!(
        "Writing {} batches of {} ({} of {} requested records)",
        config.total_batches(),
        config.batch_size,
        config.effective_record_count(),
        config.record_count
    );

    let start = Instant::now();
    let summary = seeder.load_users(source, config.record_count).await?;
    seeder.finalize().await?;
    let elapsed = start.elapsed();

    info!("Completed in {:.2} seconds", elapsed.as_secs_f64());

    Ok(SeedReport {
        batches: summary.batches,
        records_inserted: summary.records_inserted,
        seeded_total: summary.seeded_total,
        elapsed,
    })
}
