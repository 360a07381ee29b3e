//! Stagehand — Registry.
//!
//! Per-user records stored in a fixed set of named partitions. Every
//! operation is a single read-modify-write against the injected
//! `KeyValueStore`; store failures are logged and reported as
//! `WriteOutcome::Failed` rather than propagated.

pub mod application;
pub mod domain;

pub use application::registry::Registry;
pub use domain::outcome::WriteOutcome;
pub use domain::partition::{Partition, UserId};
pub use domain::record::{Record, RegistryConfig, Selector};
