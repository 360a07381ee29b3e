//! Dialogue entries.

use std::time::Duration;

use serde::Deserialize;
use stagehand_core::error::DomainError;

/// One line of dialogue and how long it stays on screen.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawEntry")]
pub struct DialogueEntry {
    /// The text typed onto the display target.
    pub text: String,
    /// How long the text is held after the entrance effect completes.
    pub visible_duration: Duration,
    /// How long to wait after the exit effect before hiding the target.
    pub post_delay: Duration,
}

impl DialogueEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(text: impl Into<String>, visible_duration: Duration, post_delay: Duration) -> Self {
        Self {
            text: text.into(),
            visible_duration,
            post_delay,
        }
    }
}

/// Catalog document form: durations are written in seconds.
#[derive(Debug, Deserialize)]
struct RawEntry {
    text: String,
    visible_duration: f64,
    #[serde(default)]
    post_delay: f64,
}

fn seconds(field: &str, value: f64) -> Result<Duration, DomainError> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| DomainError::InvalidCatalog(format!("{field} of {value}s is not usable: {e}")))
}

impl TryFrom<RawEntry> for DialogueEntry {
    type Error = DomainError;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            visible_duration: seconds("visible_duration", raw.visible_duration)?,
            post_delay: seconds("post_delay", raw.post_delay)?,
            text: raw.text,
        })
    }
}
