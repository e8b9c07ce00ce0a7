//! Database seeding utilities.

use std::path::Path;

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, QueryBuilder, Sqlite, SqliteConnection};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::schema;
use crate::config::{DEFAULT_BATCH_SIZE, PROGRESS_INTERVAL, whole_batches};
use crate::generators::{GeneratedUser, RecordSource, format_timestamp};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
    #[error("Batch size must be greater than zero")]
    InvalidBatchSize,
    #[error("Record generation failed: {0}")]
    Generation(String),
}

/// SQLite's default cap on bound parameters in one statement.
const SQLITE_MAX_VARIABLES: usize = 32_766;

/// Columns bound per `User` row.
const USER_COLUMNS: usize = 7;

/// Rows per multi-row `INSERT` so a statement stays under the parameter cap.
const ROWS_PER_STATEMENT: usize = SQLITE_MAX_VARIABLES / USER_COLUMNS;

/// Outcome of the transactional bulk load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub batches: usize,
    pub records_inserted: usize,
    /// Value written to `UserStats.TotalUsers`.
    pub seeded_total: i64,
}

/// Database seeder owning the single connection used for a run.
pub struct Seeder {
    conn: SqliteConnection,
    batch_size: usize,
}

impl Seeder {
    /// Opens (creating if needed) the SQLite file at `path`.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let conn = SqliteConnection::connect_with(&options).await?;
        debug!("Opened database {}", path.display());

        Ok(Self::new(conn))
    }

    /// Wraps an already-open connection.
    pub fn new(conn: SqliteConnection) -> Self {
        Self {
            conn,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Sets the batch size for bulk operations.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Creates `User` and `UserStats` if absent.
    pub async fn initialize_schema(&mut self) -> Result<(), SeedError> {
        schema::create_tables(&mut self.conn).await
    }

    /// Bulk-loads `floor(record_count / batch_size)` batches from `source`,
    /// then seeds `UserStats` with the resulting row count.
    ///
    /// Everything runs in one transaction. On error the transaction is rolled
    /// back and the error is returned as-is, so either every batch lands or
    /// none does.
    pub async fn load_users<S: RecordSource>(
        &mut self,
        source: &mut S,
        record_count: usize,
    ) -> Result<LoadSummary, SeedError> {
        let batch_size = self.batch_size;
        if batch_size == 0 {
            return Err(SeedError::InvalidBatchSize);
        }
        let total_batches = whole_batches(record_count, batch_size);

        info!("Generating {} records...", record_count);

        let mut tx = self.conn.begin().await?;
        match load_in_transaction(&mut tx, source, total_batches, batch_size).await {
            Ok(summary) => {
                tx.commit().await?;
                Ok(summary)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Rollback failed: {}", rollback_err);
                }
                Err(err)
            }
        }
    }

    /// Builds the secondary indexes and installs the `UserStats` triggers.
    /// Runs after the bulk load has committed.
    pub async fn finalize(&mut self) -> Result<(), SeedError> {
        info!("Creating indexes...");
        schema::create_indexes(&mut self.conn).await?;
        schema::install_triggers(&mut self.conn).await
    }

    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }

    /// Closes the underlying connection.
    pub async fn close(self) -> Result<(), SeedError> {
        self.conn.close().await?;
        Ok(())
    }
}

async fn load_in_transaction<S: RecordSource>(
    conn: &mut SqliteConnection,
    source: &mut S,
    total_batches: usize,
    batch_size: usize,
) -> Result<LoadSummary, SeedError> {
    for batch in 0..total_batches {
        let users = (0..batch_size)
            .map(|_| source.next_record())
            .collect::<Result<Vec<_>, _>>()?;
        insert_user_batch(conn, &users).await?;

        if (batch + 1) % PROGRESS_INTERVAL == 0 {
            info!(
                "Progress: {:.1}%",
                (batch + 1) as f64 / total_batches as f64 * 100.0
            );
        }
    }

    let seeded_total = seed_user_stats(conn).await?;

    Ok(LoadSummary {
        batches: total_batches,
        records_inserted: total_batches * batch_size,
        seeded_total,
    })
}

/// Inserts a batch of users with multi-row `INSERT` statements.
async fn insert_user_batch(
    conn: &mut SqliteConnection,
    users: &[GeneratedUser],
) -> Result<(), SeedError> {
    for chunk in users.chunks(ROWS_PER_STATEMENT) {
        let rows = chunk
            .iter()
            .map(|user| -> Result<_, SeedError> {
                Ok((
                    user,
                    format_timestamp(user.registration_date)?,
                    format_timestamp(user.last_login)?,
                ))
            })
            .collect::<Result<Vec<_>, SeedError>>()?;

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO User (Name, Email, RegistrationDate, LastLogin, Status, Points, SubscriptionType) ",
        );
        builder.push_values(rows, |mut row, (user, registered, last_login)| {
            row.push_bind(user.name.as_str())
                .push_bind(user.email.as_str())
                .push_bind(registered)
                .push_bind(last_login)
                .push_bind(user.status.as_str())
                .push_bind(user.points)
                .push_bind(user.subscription_type.as_str());
        });
        builder.build().execute(&mut *conn).await?;
    }

    Ok(())
}

/// Writes the current `User` count into `UserStats` in one statement and
/// returns the stored value.
async fn seed_user_stats(conn: &mut SqliteConnection) -> Result<i64, SeedError> {
    let inserted = sqlx::query("INSERT INTO UserStats (TotalUsers) SELECT COUNT(*) FROM User")
        .execute(&mut *conn)
        .await?;

    let total: i64 = sqlx::query_scalar("SELECT TotalUsers FROM UserStats WHERE rowid = ?1")
        .bind(inserted.last_insert_rowid())
        .fetch_one(&mut *conn)
        .await?;
    debug!("Seeded UserStats.TotalUsers = {}", total);

    Ok(total)
}
