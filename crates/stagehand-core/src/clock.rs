//! Wall-clock time for registry timestamps.

use chrono::{DateTime, SecondsFormat, Utc};

/// Source of the time stamped onto registry `Logs` and `Comments` entries.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;

    /// The current time as an RFC 3339 string with second precision, the form
    /// stored in registry records.
    fn timestamp(&self) -> String {
        self.now().to_rfc3339_opts(SecondsFormat::Secs, false)
    }
}

/// Reads the operating system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
