//! Integration tests for complete seeding runs against on-disk SQLite files.
//!
//! These tests verify end-to-end behavior:
//! - Batch truncation and the seeded `UserStats` value
//! - Indexes and triggers present after a run
//! - Trigger bookkeeping for later inserts and deletes
//! - Schema idempotence against an existing database
//! - Full rollback when generation or an insert fails mid-run
//! - Zero batch size rejected before the database file exists

use std::path::{Path, PathBuf};

use sqlx::SqliteConnection;
use tempfile::TempDir;
use time::Duration;
use time::macros::datetime;
use user_seeder::db::stats;
use user_seeder::generators::parse_timestamp;
use user_seeder::prelude::*;

fn temp_db() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("App.db");
    (dir, path)
}

/// Reopens a seeded database for inspection.
async fn open(path: &Path) -> Seeder {
    Seeder::connect(path).await.expect("Failed to open database")
}

/// Yields random users, then fails once `fail_after` records were produced.
struct FailingSource {
    inner: RandomUsers<rand::rngs::StdRng>,
    produced: usize,
    fail_after: usize,
}

impl FailingSource {
    fn new(fail_after: usize) -> Self {
        use rand::SeedableRng;
        Self {
            inner: RandomUsers::new(
                UserGenerator::new(),
                rand::rngs::StdRng::seed_from_u64(11),
            ),
            produced: 0,
            fail_after,
        }
    }
}

impl RecordSource for FailingSource {
    fn next_record(&mut self) -> Result<GeneratedUser, SeedError> {
        if self.produced == self.fail_after {
            return Err(SeedError::Generation("simulated failure".to_string()));
        }
        self.produced += 1;
        self.inner.next_record()
    }
}

async fn insert_one_user(conn: &mut SqliteConnection) {
    sqlx::query(
        r#"
        INSERT INTO User (Name, Email, RegistrationDate, LastLogin, Status, Points, SubscriptionType)
        VALUES ('Extra User', 'extra@example.org', '2021-01-01T00:00:00', '2021-02-01T00:00:00',
                'active', 10, 'free')
        "#,
    )
    .execute(&mut *conn)
    .await
    .expect("Failed to insert user");
}

#[tokio::test]
async fn test_two_batch_scenario() {
    let (_dir, path) = temp_db();
    let config = SeedConfig::new(&path)
        .with_record_count(20_000)
        .with_batch_size(10_000)
        .with_seed(12345);

    let report = run(&config).await.expect("Seeding failed");
    assert_eq!(report.batches, 2);
    assert_eq!(report.records_inserted, 20_000);
    assert_eq!(report.seeded_total, 20_000);
    assert_eq!(report.records_inserted, config.effective_record_count());

    let mut db = open(&path).await;
    let conn = db.connection();
    assert_eq!(stats::count_users(conn).await.unwrap(), 20_000);
    assert_eq!(stats::total_users(conn).await.unwrap(), Some(20_000));

    let indexes = stats::user_schema_objects(conn, "index").await.unwrap();
    assert_eq!(indexes.len(), 4);
    for name in [
        "idx_Name",
        "idx_RegistrationDate",
        "idx_Status",
        "idx_SubscriptionType",
    ] {
        assert!(indexes.iter().any(|i| i == name), "missing index {name}");
    }

    let triggers = stats::user_schema_objects(conn, "trigger").await.unwrap();
    assert_eq!(triggers, ["AfterUserDelete", "AfterUserInsert"]);

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_remainder_records_are_dropped() {
    let (_dir, path) = temp_db();
    let config = SeedConfig::new(&path)
        .with_record_count(2_550)
        .with_batch_size(1_000)
        .with_seed(1);

    let report = run(&config).await.expect("Seeding failed");
    assert_eq!(report.records_inserted, 2_000);

    let mut db = open(&path).await;
    assert_eq!(stats::count_users(db.connection()).await.unwrap(), 2_000);
    assert_eq!(stats::total_users(db.connection()).await.unwrap(), Some(2_000));
    db.close().await.unwrap();
}

#[tokio::test]
async fn test_generated_rows_respect_column_invariants() {
    let (_dir, path) = temp_db();
    let config = SeedConfig::new(&path)
        .with_record_count(1_000)
        .with_batch_size(500)
        .with_seed(7);
    run(&config).await.expect("Seeding failed");

    let mut db = open(&path).await;
    let rows: Vec<(String, String, String, String, String, i64, String)> = sqlx::query_as(
        "SELECT Name, Email, RegistrationDate, LastLogin, Status, Points, SubscriptionType FROM User",
    )
    .fetch_all(db.connection())
    .await
    .unwrap();
    assert_eq!(rows.len(), 1_000);

    let start = datetime!(2020-01-01 00:00:00);
    let end = start + Duration::days(1460);
    for (name, email, registered, last_login, status, points, tier) in rows {
        assert!(!name.is_empty());
        assert!(email.contains('@'));

        let registered = parse_timestamp(&registered).expect("bad RegistrationDate");
        let last_login = parse_timestamp(&last_login).expect("bad LastLogin");
        assert!(registered >= start && registered <= end);
        assert!(last_login >= registered);

        assert!(Status::from_db_str(&status).is_some(), "bad status {status}");
        assert!(SubscriptionType::from_db_str(&tier).is_some(), "bad tier {tier}");
        assert!((0..=10_000).contains(&points));
    }

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_triggers_track_later_inserts_and_deletes() {
    let (_dir, path) = temp_db();
    let config = SeedConfig::new(&path)
        .with_record_count(100)
        .with_batch_size(50)
        .with_seed(3);
    run(&config).await.expect("Seeding failed");

    let mut db = open(&path).await;
    let conn = db.connection();

    insert_one_user(conn).await;
    assert_eq!(stats::total_users(conn).await.unwrap(), Some(101));

    sqlx::query("DELETE FROM User WHERE Id = (SELECT MIN(Id) FROM User)")
        .execute(&mut *conn)
        .await
        .unwrap();
    assert_eq!(stats::total_users(conn).await.unwrap(), Some(100));
    assert_eq!(stats::count_users(conn).await.unwrap(), 100);

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_schema_initialization_is_idempotent() {
    let (_dir, path) = temp_db();
    let config = SeedConfig::new(&path)
        .with_record_count(30)
        .with_batch_size(10)
        .with_seed(5);
    run(&config).await.expect("Seeding failed");

    let mut db = open(&path).await;
    db.initialize_schema().await.expect("Re-initializing failed");
    db.initialize_schema().await.expect("Re-initializing failed");
    assert_eq!(stats::count_users(db.connection()).await.unwrap(), 30);
    assert_eq!(stats::total_users(db.connection()).await.unwrap(), Some(30));
    db.close().await.unwrap();
}

#[tokio::test]
async fn test_failure_mid_second_batch_rolls_back_everything() {
    let (_dir, path) = temp_db();
    let config = SeedConfig::new(&path)
        .with_record_count(20_000)
        .with_batch_size(10_000);

    let mut source = FailingSource::new(15_000);
    let err = run_with_source(&config, &mut source)
        .await
        .expect_err("Run should fail");
    assert!(matches!(err, SeedError::Generation(ref msg) if msg == "simulated failure"));

    let mut db = open(&path).await;
    let conn = db.connection();
    assert_eq!(stats::count_users(conn).await.unwrap(), 0);
    assert_eq!(stats::total_users(conn).await.unwrap(), None);
    // Post-load phase never ran
    assert!(stats::user_schema_objects(conn, "trigger").await.unwrap().is_empty());
    db.close().await.unwrap();
}

#[tokio::test]
async fn test_creates_missing_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("data").join("App.db");
    let config = SeedConfig::new(&path)
        .with_record_count(10)
        .with_batch_size(10)
        .with_seed(9);

    run(&config).await.expect("Seeding failed");
    assert!(path.exists());
}

#[tokio::test]
async fn test_zero_batch_size_is_rejected_before_touching_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new").join("App.db");
    let config = SeedConfig::new(&path).with_record_count(10).with_batch_size(0);

    let err = run(&config).await.expect_err("Run should fail");
    assert!(matches!(err, SeedError::InvalidBatchSize));
    assert!(!path.exists());
    assert!(!dir.path().join("new").exists());
}

#[tokio::test]
async fn test_insert_failure_mid_second_batch_rolls_back_everything() {
    let (_dir, path) = temp_db();

    // Reject inserts once 1,500 rows exist, halfway through the second batch
    let mut db = open(&path).await;
    db.initialize_schema().await.unwrap();
    sqlx::query(
        r#"
        CREATE TRIGGER RejectLateInsert
        BEFORE INSERT ON User
        WHEN (SELECT COUNT(*) FROM User) >= 1500
        BEGIN
            SELECT RAISE(ABORT, 'insert rejected');
        END
        "#,
    )
    .execute(db.connection())
    .await
    .unwrap();
    db.close().await.unwrap();

    let config = SeedConfig::new(&path)
        .with_record_count(2_000)
        .with_batch_size(1_000)
        .with_seed(21);
    let err = run(&config).await.expect_err("Run should fail");
    match err {
        SeedError::Database(e) => assert!(e.to_string().contains("insert rejected"), "{e}"),
        other => panic!("unexpected error: {other}"),
    }

    let mut db = open(&path).await;
    let conn = db.connection();
    assert_eq!(stats::count_users(conn).await.unwrap(), 0);
    assert_eq!(stats::total_users(conn).await.unwrap(), None);
    let indexes = stats::user_schema_objects(conn, "index").await.unwrap();
    assert!(indexes.is_empty());
    db.close().await.unwrap();
}
