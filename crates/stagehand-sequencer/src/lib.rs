//! Stagehand — Dialogue Sequencer.
//!
//! Plays named sequences of dialogue entries onto a host display target.
//! Each entry runs entrance effect, hold, exit effect, post-delay and hide,
//! in that order, as one cancellable tokio task per playback.

pub mod application;
pub mod domain;

pub use application::sequencer::{PlaybackHandle, Sequencer};
pub use application::session::PlaybackSession;
pub use domain::catalog::Catalog;
pub use domain::entry::DialogueEntry;
pub use domain::status::{PlaybackOutcome, PlaybackPhase, PlaybackStatus};
pub use domain::style::{EntranceStyle, ExitStyle, PlayOptions};
pub use domain::timings::EffectTimings;
