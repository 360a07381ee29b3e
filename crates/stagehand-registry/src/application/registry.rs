//! The registry service.
//!
//! Each operation validates the partition name, performs at most one read
//! and one write against the store, and converts store failures into
//! `WriteOutcome::Failed`. Writers to the same `(partition, user)` are not
//! coordinated; the last write wins.

use std::sync::Arc;

use serde_json::{Value, json};
use stagehand_core::clock::Clock;
use stagehand_core::error::DomainError;
use stagehand_core::store::KeyValueStore;
use tracing::{debug, instrument, warn};

use crate::domain::outcome::WriteOutcome;
use crate::domain::partition::{Partition, UserId, storage_key};
use crate::domain::record::{
    Record, RegistryConfig, Selector, empty_record, is_container, is_populated, structural_clone,
};

/// Partitioned per-user records over an injected key-value store.
pub struct Registry {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    config: RegistryConfig,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// Creates a registry with the default clone limits.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_config(store, clock, RegistryConfig::default())
    }

    /// Creates a registry with explicit clone limits.
    #[must_use]
    pub fn with_config(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        config: RegistryConfig,
    ) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Returns the stored record, or an empty map when nothing is stored or
    /// the store fails. Store failures are logged.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPartition` for an unknown partition name.
    #[instrument(skip(self))]
    pub async fn get(&self, user_id: &UserId, partition: &str) -> Result<Record, DomainError> {
        let partition = Partition::parse(partition)?;
        match self.load(partition, user_id).await {
            Ok(record) => Ok(record.unwrap_or_else(empty_record)),
            Err(err) => {
                warn!(%partition, %user_id, error = %err, "get failed; returning empty record");
                Ok(empty_record())
            }
        }
    }

    /// Appends a copy of `item` to a list record. A missing or empty record
    /// starts a new list.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPartition` for an unknown partition name
    /// and `DomainError::InvalidArgument` if `item` exceeds the clone limits.
    #[instrument(skip(self, item))]
    pub async fn append(
        &self,
        user_id: &UserId,
        partition: &str,
        item: &Value,
    ) -> Result<WriteOutcome, DomainError> {
        let partition = Partition::parse(partition)?;
        let item = structural_clone(item, &self.config)?;

        let current = match self.load(partition, user_id).await {
            Ok(current) => current,
            Err(err) => return Ok(failed(partition, user_id, "append", &err)),
        };

        let mut items = match current {
            None => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(Value::Object(map)) if map.is_empty() => Vec::new(),
            Some(_) => {
                let detail = format!("{partition} record for {user_id} is not a list");
                warn!(%partition, %user_id, "append rejected: {detail}");
                return Ok(WriteOutcome::Failed(detail));
            }
        };
        items.push(item);
        let len = items.len();

        let outcome = self
            .write(partition, user_id, Value::Array(items), "append")
            .await;
        if outcome.is_applied() {
            debug!(%partition, %user_id, len, "appended item");
        }
        Ok(outcome)
    }

    /// Removes one element selected by position (list records) or key (map
    /// records). A selector that matches nothing leaves the record untouched.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPartition` for an unknown partition name.
    #[instrument(skip(self, selector))]
    pub async fn delete(
        &self,
        user_id: &UserId,
        partition: &str,
        selector: impl Into<Selector>,
    ) -> Result<WriteOutcome, DomainError> {
        let partition = Partition::parse(partition)?;
        let selector = selector.into();

        let mut record = match self.load(partition, user_id).await {
            Ok(Some(record)) => record,
            Ok(None) => return Ok(WriteOutcome::Applied),
            Err(err) => return Ok(failed(partition, user_id, "delete", &err)),
        };

        if !selector.remove_from(&mut record) {
            debug!(%partition, %user_id, ?selector, "delete matched nothing");
            return Ok(WriteOutcome::Applied);
        }

        Ok(self.write(partition, user_id, record, "delete").await)
    }

    /// Overwrites the stored record with a copy of `record`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPartition` for an unknown partition name
    /// and `DomainError::InvalidArgument` if `record` is not a map or list or
    /// exceeds the clone limits.
    #[instrument(skip(self, record))]
    pub async fn save(
        &self,
        user_id: &UserId,
        partition: &str,
        record: &Value,
    ) -> Result<WriteOutcome, DomainError> {
        let partition = Partition::parse(partition)?;
        if !is_container(record) {
            return Err(DomainError::InvalidArgument(format!(
                "{partition} record must be a map or a list"
            )));
        }
        let record = structural_clone(record, &self.config)?;

        Ok(self.write(partition, user_id, record, "save").await)
    }

    /// Removes the stored record entirely.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPartition` for an unknown partition name.
    #[instrument(skip(self))]
    pub async fn reset(
        &self,
        user_id: &UserId,
        partition: &str,
    ) -> Result<WriteOutcome, DomainError> {
        let partition = Partition::parse(partition)?;
        let key = storage_key(partition, user_id);

        match self.store.delete(&key).await {
            Ok(()) => {
                debug!(%partition, %user_id, "reset record");
                Ok(WriteOutcome::Applied)
            }
            Err(err) => Ok(failed(partition, user_id, "reset", &err)),
        }
    }

    /// Whether a non-empty record is stored. Store failures count as absent.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPartition` for an unknown partition name.
    #[instrument(skip(self))]
    pub async fn exists(&self, user_id: &UserId, partition: &str) -> Result<bool, DomainError> {
        let partition = Partition::parse(partition)?;
        match self.load(partition, user_id).await {
            Ok(record) => Ok(record.as_ref().is_some_and(is_populated)),
            Err(err) => {
                warn!(%partition, %user_id, error = %err, "exists check failed");
                Ok(false)
            }
        }
    }

    /// Appends a timestamped message to the user's `Logs` partition.
    ///
    /// # Errors
    ///
    /// See [`Registry::append`].
    pub async fn log(&self, user_id: &UserId, message: &str) -> Result<WriteOutcome, DomainError> {
        let entry = json!({
            "message": message,
            "timestamp": self.clock.timestamp(),
        });
        self.append(user_id, Partition::Logs.as_str(), &entry).await
    }

    /// Appends a timestamped comment with its origin to the user's
    /// `Comments` partition.
    ///
    /// # Errors
    ///
    /// See [`Registry::append`].
    pub async fn comment(
        &self,
        user_id: &UserId,
        text: &str,
        origin: &str,
    ) -> Result<WriteOutcome, DomainError> {
        let entry = json!({
            "text": text,
            "origin": origin,
            "timestamp": self.clock.timestamp(),
        });
        self.append(user_id, Partition::Comments.as_str(), &entry)
            .await
    }

    async fn load(
        &self,
        partition: Partition,
        user_id: &UserId,
    ) -> Result<Option<Record>, DomainError> {
        self.store.get(&storage_key(partition, user_id)).await
    }

    async fn write(
        &self,
        partition: Partition,
        user_id: &UserId,
        record: Record,
        operation: &'static str,
    ) -> WriteOutcome {
        let key = storage_key(partition, user_id);
        match self.store.set(&key, record).await {
            Ok(()) => WriteOutcome::Applied,
            Err(err) => failed(partition, user_id, operation, &err),
        }
    }
}

/// Logs a store failure and reports it to the caller.
fn failed(
    partition: Partition,
    user_id: &UserId,
    operation: &'static str,
    err: &DomainError,
) -> WriteOutcome {
    warn!(%partition, %user_id, operation, error = %err, "registry operation failed");
    WriteOutcome::Failed(err.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{Value, json};
    use stagehand_core::error::DomainError;
    use stagehand_core::store::KeyValueStore;
    use stagehand_store::MemoryStore;
    use stagehand_test_support::{FailingStore, FixedClock, WriteFailingStore};

    use super::Registry;
    use crate::domain::outcome::WriteOutcome;
    use crate::domain::partition::{Partition, UserId};
    use crate::domain::record::{RegistryConfig, Selector};

    fn fixed_clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::at("2026-01-15T10:00:00Z"))
    }

    fn registry_with(store: Arc<dyn KeyValueStore>) -> Registry {
        Registry::new(store, fixed_clock())
    }

    fn memory_registry() -> (Registry, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (registry_with(store.clone()), store)
    }

    #[tokio::test]
    async fn test_every_operation_rejects_unknown_partition() {
        // Arrange
        let (registry, store) = memory_registry();
        let user = UserId::from(1);
        let bogus = "Bank";

        // Act
        let results = [
            registry.get(&user, bogus).await.map(|_| ()),
            registry.append(&user, bogus, &json!(1)).await.map(|_| ()),
            registry
                .delete(&user, bogus, Selector::Index(0))
                .await
                .map(|_| ()),
            registry.save(&user, bogus, &json!({})).await.map(|_| ()),
            registry.reset(&user, bogus).await.map(|_| ()),
            registry.exists(&user, bogus).await.map(|_| ()),
        ];

        // Assert
        for result in results {
            assert!(matches!(result, Err(DomainError::InvalidPartition(_))));
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_get_returns_empty_map_when_nothing_stored() {
        let (registry, _) = memory_registry();

        let record = registry.get(&UserId::from(1), "Profile").await.unwrap();

        assert_eq!(record, json!({}));
    }

    #[tokio::test]
    async fn test_get_returns_empty_map_on_store_failure() {
        let registry = registry_with(Arc::new(FailingStore));

        let record = registry.get(&UserId::from(1), "Profile").await.unwrap();

        assert_eq!(record, json!({}));
    }

    #[tokio::test]
    async fn test_reset_then_exists_is_false_for_every_partition() {
        let (registry, _) = memory_registry();
        let user = UserId::from("player-7");

        for partition in Partition::ALL {
            // Arrange
            let name = partition.as_str();
            let saved = registry.save(&user, name, &json!({"seen": true})).await;
            assert_eq!(saved.unwrap(), WriteOutcome::Applied);
            assert!(registry.exists(&user, name).await.unwrap());

            // Act
            let outcome = registry.reset(&user, name).await.unwrap();

            // Assert
            assert!(outcome.is_applied());
            assert!(!registry.exists(&user, name).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_append_stores_an_independent_copy() {
        // Arrange
        let (registry, _) = memory_registry();
        let user = UserId::from(3);
        let mut item = json!({"id": "sword", "stats": {"atk": 4}});

        // Act
        let outcome = registry.append(&user, "Inventory", &item).await.unwrap();
        item["stats"]["atk"] = json!(99);
        let record = registry.get(&user, "Inventory").await.unwrap();

        // Assert
        assert!(outcome.is_applied());
        let last = record.as_array().and_then(|items| items.last()).unwrap();
        assert_eq!(last, &json!({"id": "sword", "stats": {"atk": 4}}));
    }

    #[tokio::test]
    async fn test_append_preserves_existing_items_in_order() {
        let (registry, _) = memory_registry();
        let user = UserId::from(3);

        for n in 0..3 {
            let outcome = registry.append(&user, "Progress", &json!(n)).await.unwrap();
            assert!(outcome.is_applied());
        }

        assert_eq!(
            registry.get(&user, "Progress").await.unwrap(),
            json!([0, 1, 2])
        );
    }

    #[tokio::test]
    async fn test_append_treats_empty_map_as_empty_list() {
        let (registry, _) = memory_registry();
        let user = UserId::from(3);
        let _ = registry.save(&user, "Progress", &json!({})).await.unwrap();

        let outcome = registry
            .append(&user, "Progress", &json!("a"))
            .await
            .unwrap();

        assert!(outcome.is_applied());
        assert_eq!(registry.get(&user, "Progress").await.unwrap(), json!(["a"]));
    }

    #[tokio::test]
    async fn test_append_to_populated_map_fails_without_writing() {
        // Arrange
        let (registry, _) = memory_registry();
        let user = UserId::from(3);
        let _ = registry
            .save(&user, "Settings", &json!({"volume": 3}))
            .await
            .unwrap();

        // Act
        let outcome = registry.append(&user, "Settings", &json!(1)).await.unwrap();

        // Assert
        assert!(!outcome.is_applied());
        assert_eq!(
            registry.get(&user, "Settings").await.unwrap(),
            json!({"volume": 3})
        );
    }

    #[tokio::test]
    async fn test_append_reports_store_failure_as_outcome() {
        let registry = registry_with(Arc::new(FailingStore));

        let outcome = registry
            .append(&UserId::from(1), "Logs", &json!("x"))
            .await
            .unwrap();

        match outcome {
            WriteOutcome::Failed(detail) => assert!(detail.contains("connection refused")),
            WriteOutcome::Applied => panic!("expected Failed"),
        }
    }

    #[tokio::test]
    async fn test_append_reports_write_failure_as_outcome() {
        let registry = registry_with(Arc::new(WriteFailingStore::new(Some(json!([1])))));

        let (applied, detail) = registry
            .append(&UserId::from(1), "Logs", &json!(2))
            .await
            .unwrap()
            .into_parts();

        assert!(!applied);
        assert!(detail.unwrap().contains("write quota exceeded"));
    }

    #[tokio::test]
    async fn test_append_rejects_oversized_item_before_touching_store() {
        // Arrange
        let store = Arc::new(MemoryStore::new());
        let config = RegistryConfig {
            max_depth: 2,
            max_nodes: 100,
        };
        let registry = Registry::with_config(store.clone(), fixed_clock(), config);

        // Act
        let result = registry
            .append(&UserId::from(1), "Inventory", &json!([[[1]]]))
            .await;

        // Assert
        assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_position_removes_element() {
        let (registry, _) = memory_registry();
        let user = UserId::from(5);
        let _ = registry
            .save(&user, "Inventory", &json!(["a", "b", "c"]))
            .await
            .unwrap();

        let outcome = registry.delete(&user, "Inventory", 1_usize).await.unwrap();

        assert!(outcome.is_applied());
        assert_eq!(
            registry.get(&user, "Inventory").await.unwrap(),
            json!(["a", "c"])
        );
    }

    #[tokio::test]
    async fn test_delete_out_of_range_position_is_a_noop() {
        let (registry, _) = memory_registry();
        let user = UserId::from(5);
        let _ = registry
            .save(&user, "Inventory", &json!(["a", "b", "c"]))
            .await
            .unwrap();

        let outcome = registry.delete(&user, "Inventory", 10_usize).await.unwrap();

        assert!(outcome.is_applied());
        assert_eq!(
            registry.get(&user, "Inventory").await.unwrap(),
            json!(["a", "b", "c"])
        );
    }

    #[tokio::test]
    async fn test_delete_by_key_removes_map_entry() {
        let (registry, _) = memory_registry();
        let user = UserId::from(5);
        let _ = registry
            .save(&user, "Settings", &json!({"music": 1, "sfx": 2}))
            .await
            .unwrap();

        let outcome = registry.delete(&user, "Settings", "music").await.unwrap();

        assert!(outcome.is_applied());
        assert_eq!(
            registry.get(&user, "Settings").await.unwrap(),
            json!({"sfx": 2})
        );
    }

    #[tokio::test]
    async fn test_delete_accepts_selector_parsed_from_host_value() {
        let (registry, _) = memory_registry();
        let user = UserId::from(5);
        let _ = registry
            .save(&user, "Inventory", &json!(["a", "b"]))
            .await
            .unwrap();
        let selector = Selector::from_value(&json!(0)).unwrap();

        let outcome = registry.delete(&user, "Inventory", selector).await.unwrap();

        assert!(outcome.is_applied());
        assert_eq!(
            registry.get(&user, "Inventory").await.unwrap(),
            json!(["b"])
        );
    }

    #[tokio::test]
    async fn test_delete_reports_write_failure_as_outcome() {
        let registry = registry_with(Arc::new(WriteFailingStore::new(Some(json!(["a"])))));

        let outcome = registry
            .delete(&UserId::from(1), "Inventory", 0_usize)
            .await
            .unwrap();

        assert!(!outcome.is_applied());
    }

    #[tokio::test]
    async fn test_save_then_get_returns_equal_value() {
        // Arrange
        let (registry, _) = memory_registry();
        let user = UserId::from(8);
        let mut record = json!({"a": 1});

        // Act
        let outcome = registry.save(&user, "Profile", &record).await.unwrap();
        record["a"] = json!(2);
        let loaded = registry.get(&user, "Profile").await.unwrap();

        // Assert
        assert!(outcome.is_applied());
        assert_eq!(loaded, json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_save_rejects_non_container() {
        let (registry, store) = memory_registry();

        for record in [json!(1), json!("text"), json!(null), json!(false)] {
            let result = registry.save(&UserId::from(8), "Profile", &record).await;
            assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_save_reports_store_failure_as_outcome() {
        let registry = registry_with(Arc::new(FailingStore));

        let outcome = registry
            .save(&UserId::from(8), "Profile", &json!({"a": 1}))
            .await
            .unwrap();

        assert!(!outcome.is_applied());
    }

    #[tokio::test]
    async fn test_reset_reports_store_failure_as_outcome() {
        let registry = registry_with(Arc::new(FailingStore));

        let outcome = registry.reset(&UserId::from(8), "Profile").await.unwrap();

        assert!(!outcome.is_applied());
    }

    #[tokio::test]
    async fn test_exists_is_false_for_empty_containers_and_store_failures() {
        let (registry, _) = memory_registry();
        let user = UserId::from(2);
        let _ = registry.save(&user, "Settings", &json!([])).await.unwrap();

        assert!(!registry.exists(&user, "Settings").await.unwrap());
        assert!(
            !registry_with(Arc::new(FailingStore))
                .exists(&user, "Settings")
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_log_appends_timestamped_message() {
        // Arrange
        let (registry, _) = memory_registry();
        let user = UserId::from(11);

        // Act
        let outcome = registry.log(&user, "joined lobby").await.unwrap();

        // Assert
        assert!(outcome.is_applied());
        let logs = registry.get(&user, "Logs").await.unwrap();
        assert_eq!(
            logs,
            json!([{
                "message": "joined lobby",
                "timestamp": "2026-01-15T10:00:00+00:00",
            }])
        );
    }

    #[tokio::test]
    async fn test_comment_appends_text_with_origin() {
        let (registry, _) = memory_registry();
        let user = UserId::from(11);

        let _ = registry
            .comment(&user, "nice build", "moderator")
            .await
            .unwrap();
        let _ = registry.comment(&user, "thanks", "self").await.unwrap();

        let comments = registry.get(&user, "Comments").await.unwrap();
        let comments: &Vec<Value> = comments.as_array().unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0]["text"], "nice build");
        assert_eq!(comments[0]["origin"], "moderator");
        assert_eq!(comments[1]["text"], "thanks");
        assert_eq!(comments[1]["timestamp"], "2026-01-15T10:00:00+00:00");
    }

    #[tokio::test]
    async fn test_partitions_are_isolated_per_user() {
        let (registry, _) = memory_registry();
        let alice = UserId::from("alice");
        let bob = UserId::from("bob");

        let _ = registry
            .save(&alice, "Profile", &json!({"n": 1}))
            .await
            .unwrap();

        assert!(registry.exists(&alice, "Profile").await.unwrap());
        assert!(!registry.exists(&bob, "Profile").await.unwrap());
        assert!(!registry.exists(&alice, "Inventory").await.unwrap());
    }
}
