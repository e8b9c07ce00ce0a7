//! Read-side queries over a seeded database.

use sqlx::SqliteConnection;

use super::SeedError;

/// Live row count of `User`.
pub async fn count_users(conn: &mut SqliteConnection) -> Result<i64, SeedError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM User")
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

/// The user count as downstream readers see it: the first `UserStats` row.
///
/// `None` when `UserStats` has no rows yet.
pub async fn total_users(conn: &mut SqliteConnection) -> Result<Option<i64>, SeedError> {
    let total: Option<i64> = sqlx::query_scalar("SELECT TotalUsers FROM UserStats LIMIT 1")
        .fetch_optional(&mut *conn)
        .await?;
    Ok(total)
}

/// Names of the indexes or triggers (`kind`) attached to `User`, sorted.
/// SQLite's automatic indexes are excluded.
pub async fn user_schema_objects(
    conn: &mut SqliteConnection,
    kind: &str,
) -> Result<Vec<String>, SeedError> {
    let names: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT name FROM sqlite_master
        WHERE type = ?1 AND tbl_name = 'User' AND name NOT LIKE 'sqlite_%'
        ORDER BY name
        "#,
    )
    .bind(kind)
    .fetch_all(&mut *conn)
    .await?;
    Ok(names)
}
