//! Enumerated column values for the `User` table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Account status stored in `User.Status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Inactive,
    Suspended,
    Pending,
}

impl Status {
    /// Every status, in the order they are sampled from.
    pub const ALL: [Status; 4] = [
        Status::Active,
        Status::Inactive,
        Status::Suspended,
        Status::Pending,
    ];

    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Inactive => "inactive",
            Status::Suspended => "suspended",
            Status::Pending => "pending",
        }
    }

    /// Parses the database string representation.
    pub fn from_db_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subscription tier stored in `User.SubscriptionType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionType {
    Free,
    Basic,
    Premium,
    Enterprise,
}

impl SubscriptionType {
    pub const ALL: [SubscriptionType; 4] = [
        SubscriptionType::Free,
        SubscriptionType::Basic,
        SubscriptionType::Premium,
        SubscriptionType::Enterprise,
    ];

    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionType::Free => "free",
            SubscriptionType::Basic => "basic",
            SubscriptionType::Premium => "premium",
            SubscriptionType::Enterprise => "enterprise",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.as_str() == s)
    }
}

impl fmt::Display for SubscriptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
