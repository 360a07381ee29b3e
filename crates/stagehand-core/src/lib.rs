//! Stagehand Core — shared abstractions.
//!
//! This crate defines the traits and types that the registry and the
//! dialogue sequencer depend on: the key-value store boundary, the display
//! target and scheduler boundaries, and the deterministic clock and RNG
//! seams. It contains no storage or rendering code.

pub mod clock;
pub mod display;
pub mod error;
pub mod rng;
pub mod scheduler;
pub mod store;
