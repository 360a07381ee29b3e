//! In-process `KeyValueStore`.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;
use stagehand_core::error::DomainError;
use stagehand_core::store::KeyValueStore;

/// A `KeyValueStore` held entirely in memory. Values do not survive the
/// process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored. Reports zero if the lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        match self.records.read() {
            Ok(records) => records.len(),
            Err(_) => 0,
        }
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> DomainError {
    DomainError::StoreFailure("memory store lock poisoned".to_owned())
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, DomainError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), DomainError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        records.insert(key.to_owned(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        records.remove(key);
        Ok(())
    }
}
