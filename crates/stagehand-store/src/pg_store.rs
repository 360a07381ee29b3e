//! `PostgreSQL` implementation of the `KeyValueStore` trait.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::debug;

use stagehand_core::error::DomainError;
use stagehand_core::store::KeyValueStore;

use crate::schema::CREATE_KV_RECORDS_TABLE;

/// PostgreSQL-backed key-value store over the `kv_records` table.
#[derive(Debug, Clone)]
pub struct PgKeyValueStore {
    pool: PgPool,
}

impl PgKeyValueStore {
    /// Creates a new `PgKeyValueStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `kv_records` table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StoreFailure` if the DDL statement fails.
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::raw_sql(CREATE_KV_RECORDS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| store_failure(&e))?;
        Ok(())
    }
}

fn store_failure(err: &sqlx::Error) -> DomainError {
    DomainError::StoreFailure(err.to_string())
}

#[async_trait]
impl KeyValueStore for PgKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, DomainError> {
        let row: Option<(Json<Value>,)> =
            sqlx::query_as("SELECT value FROM kv_records WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| store_failure(&e))?;
        Ok(row.map(|(Json(value),)| value))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO kv_records (key, value, updated_at) VALUES ($1, $2, NOW()) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()",
        )
        .bind(key)
        .bind(Json(value))
        .execute(&self.pool)
        .await
        .map_err(|e| store_failure(&e))?;
        debug!(key, "stored record");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM kv_records WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| store_failure(&e))?;
        debug!(key, rows = result.rows_affected(), "deleted record");
        Ok(())
    }
}
