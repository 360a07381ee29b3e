//! Application layer for the Dialogue Sequencer.

pub(crate) mod effects;
pub mod sequencer;
pub mod session;
