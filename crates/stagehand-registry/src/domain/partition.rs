//! Partitions and user identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use stagehand_core::error::DomainError;

/// One of the fixed record categories a user's data is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Partition {
    /// Player profile data.
    Profile,
    /// Owned items.
    Inventory,
    /// Quest and level progress.
    Progress,
    /// Client preferences.
    Settings,
    /// Timestamped log lines written through `Registry::log`.
    Logs,
    /// Timestamped comments written through `Registry::comment`.
    Comments,
}

impl Partition {
    /// Every supported partition.
    pub const ALL: [Partition; 6] = [
        Partition::Profile,
        Partition::Inventory,
        Partition::Progress,
        Partition::Settings,
        Partition::Logs,
        Partition::Comments,
    ];

    /// The partition's canonical name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Partition::Profile => "Profile",
            Partition::Inventory => "Inventory",
            Partition::Progress => "Progress",
            Partition::Settings => "Settings",
            Partition::Logs => "Logs",
            Partition::Comments => "Comments",
        }
    }

    /// Resolves a partition by its exact name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPartition` for any other name.
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        Self::ALL
            .into_iter()
            .find(|partition| partition.as_str() == name)
            .ok_or_else(|| DomainError::InvalidPartition(name.to_owned()))
    }
}

impl FromStr for Partition {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque identifier of the user a record belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Store key for a `(partition, user)` pair.
pub(crate) fn storage_key(partition: Partition, user_id: &UserId) -> String {
    format!("{partition}/{user_id}")
}
