//! Domain layer for the Registry.

pub mod outcome;
pub mod partition;
pub mod record;
