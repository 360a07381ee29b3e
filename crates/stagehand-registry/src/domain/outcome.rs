//! Result of a registry write.

/// Whether a write reached the store.
///
/// Store failures are recovered locally and surface here instead of as an
/// `Err`; callers must inspect the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum WriteOutcome {
    /// The write was applied (or was a no-op that needed no write).
    Applied,
    /// The write did not apply; carries the error detail.
    Failed(String),
}

impl WriteOutcome {
    /// Returns `true` if the write was applied.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    /// Returns the failure detail, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Applied => None,
            Self::Failed(detail) => Some(detail),
        }
    }

    /// Splits the outcome into a success flag and an optional error detail.
    #[must_use]
    pub fn into_parts(self) -> (bool, Option<String>) {
        match self {
            Self::Applied => (true, None),
            Self::Failed(detail) => (false, Some(detail)),
        }
    }
}
