//! Key-value store abstraction.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::DomainError;

/// An external key-value store keyed by partition-qualified strings.
///
/// Every call is a single attempt. Implementations report failures as
/// `DomainError::StoreFailure`; callers decide whether to propagate them.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Load the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Value>, DomainError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Value) -> Result<(), DomainError>;

    /// Remove the value stored under `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), DomainError>;
}
