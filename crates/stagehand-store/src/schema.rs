//! Key-value store database schema.

/// SQL to create the records table. Mirrors `migrations/0001_create_kv_records.sql`.
pub const CREATE_KV_RECORDS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS kv_records (
    key        TEXT PRIMARY KEY,
    value      JSONB NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";
