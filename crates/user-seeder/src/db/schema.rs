//! SQL for the seeded database: tables, secondary indexes, and the
//! `UserStats` maintenance triggers.

use sqlx::SqliteConnection;
use tracing::debug;

use super::SeedError;

pub const CREATE_USER_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS User (
    Id INTEGER PRIMARY KEY,
    Name TEXT,
    Email TEXT,
    RegistrationDate TIMESTAMP,
    LastLogin TIMESTAMP,
    Status TEXT,
    Points INTEGER,
    SubscriptionType TEXT
)
"#;

pub const CREATE_USER_STATS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS UserStats (
    TotalUsers INTEGER NOT NULL DEFAULT 0
)
"#;

/// Secondary indexes as `(name, statement)`, built after the bulk load.
pub const USER_INDEXES: [(&str, &str); 4] = [
    (
        "idx_Name",
        "CREATE INDEX IF NOT EXISTS idx_Name ON User(Name)",
    ),
    (
        "idx_RegistrationDate",
        "CREATE INDEX IF NOT EXISTS idx_RegistrationDate ON User(RegistrationDate)",
    ),
    (
        "idx_Status",
        "CREATE INDEX IF NOT EXISTS idx_Status ON User(Status)",
    ),
    (
        "idx_SubscriptionType",
        "CREATE INDEX IF NOT EXISTS idx_SubscriptionType ON User(SubscriptionType)",
    ),
];

pub const AFTER_USER_INSERT_TRIGGER: &str = r#"
CREATE TRIGGER IF NOT EXISTS AfterUserInsert
AFTER INSERT ON User
BEGIN
    UPDATE UserStats
    SET TotalUsers = TotalUsers + 1;
END
"#;

pub const AFTER_USER_DELETE_TRIGGER: &str = r#"
CREATE TRIGGER IF NOT EXISTS AfterUserDelete
AFTER DELETE ON User
BEGIN
    UPDATE UserStats
    SET TotalUsers = TotalUsers - 1;
END
"#;

/// Trigger names as `(name, statement)`.
pub const USER_STATS_TRIGGERS: [(&str, &str); 2] = [
    ("AfterUserInsert", AFTER_USER_INSERT_TRIGGER),
    ("AfterUserDelete", AFTER_USER_DELETE_TRIGGER),
];

/// Creates `User` and `UserStats` if they are missing. Existing tables and
/// their rows are left alone.
pub async fn create_tables(conn: &mut SqliteConnection) -> Result<(), SeedError> {
    for statement in [CREATE_USER_TABLE, CREATE_USER_STATS_TABLE] {
        sqlx::query(statement).execute(&mut *conn).await?;
    }
    debug!("Schema ready");
    Ok(())
}

/// Creates the secondary indexes on `User`.
pub async fn create_indexes(conn: &mut SqliteConnection) -> Result<(), SeedError> {
    for (name, statement) in USER_INDEXES {
        sqlx::query(statement).execute(&mut *conn).await?;
        debug!("Created index {}", name);
    }
    Ok(())
}

/// Installs the triggers that keep `UserStats.TotalUsers` in step with
/// future inserts and deletes on `User`. Rows already present are not
/// counted by these.
pub async fn install_triggers(conn: &mut SqliteConnection) -> Result<(), SeedError> {
    for (name, statement) in USER_STATS_TRIGGERS {
        sqlx::query(statement).execute(&mut *conn).await?;
        debug!("Installed trigger {}", name);
    }
    Ok(())
}
