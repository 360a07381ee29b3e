//! Playback phases and outcomes.

/// Where a playback session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// Created but not yet started.
    Idle,
    /// Running the entrance effect.
    Entering,
    /// Holding the fully rendered text.
    Holding,
    /// Running the exit effect.
    Exiting,
    /// Waiting out the post-delay before hiding the target.
    Advancing,
    /// Every entry has played.
    Done,
    /// Stopped by its cancellation token.
    Cancelled,
}

/// Snapshot published on every phase change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackStatus {
    /// Index of the entry being played.
    pub index: usize,
    /// Current phase.
    pub phase: PlaybackPhase,
}

impl PlaybackStatus {
    /// The status of a session that has not started.
    #[must_use]
    pub fn idle() -> Self {
        Self {
            index: 0,
            phase: PlaybackPhase::Idle,
        }
    }
}

/// How a playback session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// All entries played.
    Completed {
        /// Number of entries played.
        entries: usize,
    },
    /// The session was cancelled before finishing.
    Cancelled {
        /// Number of entries that fully completed before cancellation.
        completed_entries: usize,
    },
}
