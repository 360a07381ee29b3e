//! Stagehand Store — `KeyValueStore` implementations.
//!
//! `MemoryStore` keeps records in process and backs local runs and tests;
//! `PgKeyValueStore` persists records in a single `PostgreSQL` table.

pub mod memory;
pub mod pg_store;
pub mod schema;

pub use memory::MemoryStore;
pub use pg_store::PgKeyValueStore;
