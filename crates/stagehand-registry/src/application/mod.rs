//! Application layer for the Registry.

pub mod registry;
