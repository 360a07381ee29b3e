//! Test stores — failing `KeyValueStore` implementations for tests.

use async_trait::async_trait;
use serde_json::Value;
use stagehand_core::error::DomainError;
use stagehand_core::store::KeyValueStore;

/// A store that always returns a store failure. Useful for testing the
/// registry's log-and-recover paths.
#[derive(Debug)]
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<Value>, DomainError> {
        Err(DomainError::StoreFailure("connection refused".into()))
    }

    async fn set(&self, _key: &str, _value: Value) -> Result<(), DomainError> {
        Err(DomainError::StoreFailure("connection refused".into()))
    }

    async fn delete(&self, _key: &str) -> Result<(), DomainError> {
        Err(DomainError::StoreFailure("connection refused".into()))
    }
}

/// A store whose reads return a fixed value and whose writes fail.
#[derive(Debug)]
pub struct WriteFailingStore {
    value: Option<Value>,
}

impl WriteFailingStore {
    /// Create a store that returns `value` from every `get`.
    #[must_use]
    pub fn new(value: Option<Value>) -> Self {
        Self { value }
    }
}

#[async_trait]
impl KeyValueStore for WriteFailingStore {
    async fn get(&self, _key: &str) -> Result<Option<Value>, DomainError> {
        Ok(self.value.clone())
    }

    async fn set(&self, _key: &str, _value: Value) -> Result<(), DomainError> {
        Err(DomainError::StoreFailure("write quota exceeded".into()))
    }

    async fn delete(&self, _key: &str) -> Result<(), DomainError> {
        Err(DomainError::StoreFailure("write quota exceeded".into()))
    }
}
