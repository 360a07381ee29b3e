//! Integration tests for `PgKeyValueStore`.
//!
//! These need a live database (`DATABASE_URL`); run them with
//! `cargo test -p stagehand-store -- --ignored`.

use serde_json::json;
use sqlx::PgPool;
use stagehand_core::store::KeyValueStore;
use stagehand_store::PgKeyValueStore;

// --- get ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_get_returns_none_for_missing_key(pool: PgPool) {
    let store = PgKeyValueStore::new(pool);

    let value = store.get("Profile/missing").await.unwrap();

    assert!(value.is_none());
}

// --- set + get round-trip ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_set_then_get_returns_nested_value(pool: PgPool) {
    let store = PgKeyValueStore::new(pool);
    let value = json!({"items": [{"id": 1, "tags": ["a", "b"]}], "gold": 12});

    store.set("Inventory/7", value.clone()).await.unwrap();

    assert_eq!(store.get("Inventory/7").await.unwrap(), Some(value));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_set_overwrites_existing_key(pool: PgPool) {
    let store = PgKeyValueStore::new(pool);

    store.set("Settings/7", json!({"volume": 1})).await.unwrap();
    store.set("Settings/7", json!({"volume": 5})).await.unwrap();

    assert_eq!(
        store.get("Settings/7").await.unwrap(),
        Some(json!({"volume": 5}))
    );
}

// --- delete ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_delete_removes_key(pool: PgPool) {
    let store = PgKeyValueStore::new(pool);
    store.set("Logs/7", json!([1, 2])).await.unwrap();

    store.delete("Logs/7").await.unwrap();

    assert!(store.get("Logs/7").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn test_ensure_schema_is_idempotent(pool: PgPool) {
    let store = PgKeyValueStore::new(pool);

    store.ensure_schema().await.unwrap();
    store.ensure_schema().await.unwrap();
}
