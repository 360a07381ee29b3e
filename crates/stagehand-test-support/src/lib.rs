//! Shared test doubles and utilities for Stagehand.

mod clock;
mod display;
mod rng;
mod scheduler;
mod store;

pub use clock::FixedClock;
pub use display::{DisplayOp, RecordingDisplay};
pub use rng::{MockRng, SequenceRng};
pub use scheduler::VirtualScheduler;
pub use store::{FailingStore, WriteFailingStore};
