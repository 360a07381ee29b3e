//! Test clock — a `Clock` pinned to one instant.

use chrono::{DateTime, Utc};
use stagehand_core::clock::Clock;

/// Always reports the instant it was built with, so registry timestamps can
/// be asserted literally.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Pins the clock to an RFC 3339 instant such as `2026-01-15T10:00:00Z`.
    ///
    /// # Panics
    ///
    /// Panics if `instant` is not valid RFC 3339.
    #[must_use]
    pub fn at(instant: &str) -> Self {
        let parsed = DateTime::parse_from_rfc3339(instant)
            .unwrap_or_else(|e| panic!("invalid test instant {instant}: {e}"));
        Self(parsed.with_timezone(&Utc))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
