//! Domain layer for the Dialogue Sequencer.

pub mod catalog;
pub mod entry;
pub mod status;
pub mod style;
pub mod timings;
