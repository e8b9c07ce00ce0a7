//! Synthetic user rows.

use fake::{Fake, faker::name::en::Name};
use rand::Rng;
use time::format_description::BorrowedFormatItem;
use time::macros::{date, format_description};
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime};

use crate::db::SeedError;
use crate::models::{Status, SubscriptionType};

/// ISO-8601 without offset, e.g. `2021-07-04T00:00:00`.
pub const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Formats a timestamp the way it is stored in the `User` table.
pub fn format_timestamp(ts: PrimitiveDateTime) -> Result<String, time::error::Format> {
    ts.format(TIMESTAMP_FORMAT)
}

/// Parses a timestamp read back from the `User` table.
pub fn parse_timestamp(s: &str) -> Result<PrimitiveDateTime, time::error::Parse> {
    PrimitiveDateTime::parse(s, TIMESTAMP_FORMAT)
}

/// Generated user data ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedUser {
    pub name: String,
    pub email: String,
    pub registration_date: PrimitiveDateTime,
    pub last_login: PrimitiveDateTime,
    pub status: Status,
    pub points: i64,
    pub subscription_type: SubscriptionType,
}

/// Configuration for user generation.
#[derive(Debug, Clone)]
pub struct UserGenConfig {
    /// First possible registration day.
    pub start_date: Date,
    /// Registration dates fall in `start_date + [0, registration_window_days]`.
    pub registration_window_days: i64,
    /// Upper bound (inclusive) for points.
    pub max_points: i64,
}

impl Default for UserGenConfig {
    fn default() -> Self {
        Self {
            start_date: date!(2020 - 01 - 01),
            // Four years
            registration_window_days: 1460,
            max_points: 10_000,
        }
    }
}

/// Generates realistic user data for testing.
pub struct UserGenerator {
    config: UserGenConfig,
    now: PrimitiveDateTime,
}

impl UserGenerator {
    /// Creates a new user generator with default configuration, anchored at
    /// the current UTC time.
    pub fn new() -> Self {
        Self::with_config(UserGenConfig::default())
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: UserGenConfig) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            config,
            now: PrimitiveDateTime::new(now.date(), now.time()),
        }
    }

    /// Pins the instant that bounds `last_login`.
    pub fn with_now(mut self, now: PrimitiveDateTime) -> Self {
        self.now = now;
        self
    }

    /// Generates a single user.
    pub fn generate(&self, rng: &mut impl Rng) -> GeneratedUser {
        let name: String = Name().fake_with_rng(rng);
        let email = self.generate_email(&name, rng);

        let registration_date = self.config.start_date.midnight()
            + Duration::days(rng.gen_range(0..=self.config.registration_window_days));

        // Never past `now`, even when the registration window reaches into the future
        let days_since = (self.now - registration_date).whole_days().max(0);
        let last_login = registration_date + Duration::days(rng.gen_range(0..=days_since));

        GeneratedUser {
            name,
            email,
            registration_date,
            last_login,
            status: Status::ALL[rng.gen_range(0..Status::ALL.len())],
            points: rng.gen_range(0..=self.config.max_points),
            subscription_type: SubscriptionType::ALL
                [rng.gen_range(0..SubscriptionType::ALL.len())],
        }
    }

    /// Generates multiple users.
    pub fn generate_batch(&self, count: usize, rng: &mut impl Rng) -> Vec<GeneratedUser> {
        (0..count).map(|_| self.generate(rng)).collect()
    }

    /// Generates an email from a name.
    fn generate_email(&self, name: &str, rng: &mut impl Rng) -> String {
        let normalized: String = name
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == ' ')
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(".");
        let local = if normalized.is_empty() {
            "user"
        } else {
            normalized.as_str()
        };

        let suffix: u32 = rng.gen_range(1..9999);
        let domains = ["gmail.com", "outlook.com", "yahoo.com", "example.org"];
        let domain = domains[rng.gen_range(0..domains.len())];

        format!("{local}{suffix}@{domain}")
    }
}

impl Default for UserGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the batch loader pulls rows from.
pub trait RecordSource {
    fn next_record(&mut self) -> Result<GeneratedUser, SeedError>;
}

/// Production record source: a [`UserGenerator`] driven by its own RNG.
pub struct RandomUsers<R> {
    generator: UserGenerator,
    rng: R,
}

impl<R: Rng> RandomUsers<R> {
    pub fn new(generator: UserGenerator, rng: R) -> Self {
        Self { generator, rng }
    }
}

impl<R: Rng> RecordSource for RandomUsers<R> {
    fn next_record(&mut self) -> Result<GeneratedUser, SeedError> {
        Ok(self.generator.generate(&mut self.rng))
    }
}
