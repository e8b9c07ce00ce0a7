//! Example: Seed a small reproducible database and inspect it.
//!
//! This creates a database suitable for manual checks of the consumer app:
//! - 50,000 users in 5 batches, generated from a fixed seed
//! - `UserStats` seeded with the row count
//! - Indexes and triggers installed
//!
//! Run with:
//! ```
//! cargo run --example seed_sample -- data/Sample.db
//! ```

use tracing_subscriber::EnvFilter;
use user_seeder::db::stats;
use user_seeder::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/Sample.db".to_string());

    let config = SeedConfig::new(&path)
        .with_record_count(50_000)
        .with_seed(54321);
    let report = run(&config).await?;

    tracing::info!("Sample seeded successfully!");
    tracing::info!("  Users: {}", report.records_inserted);
    tracing::info!("  Elapsed: {:.2}s", report.elapsed.as_secs_f64());

    // Reopen and look at what a consumer would see
    let mut seeder = Seeder::connect(&path).await?;
    let conn = seeder.connection();
    tracing::info!("  UserStats.TotalUsers: {:?}", stats::total_users(conn).await?);
    tracing::info!(
        "  Indexes: {}",
        stats::user_schema_objects(conn, "index").await?.join(", ")
    );
    tracing::info!(
        "  Triggers: {}",
        stats::user_schema_objects(conn, "trigger").await?.join(", ")
    );

    let per_tier: Vec<(String, i64)> = sqlx::query_as(
        "SELECT SubscriptionType, COUNT(*) FROM User GROUP BY SubscriptionType ORDER BY 1",
    )
    .fetch_all(&mut *conn)
    .await?;
    tracing::info!("Users per subscription tier:");
    for (tier, count) in per_tier {
        tracing::info!("  {tier}: {count}");
    }

    seeder.close().await?;
    Ok(())
}
