//! Entrance and exit effect styles.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use stagehand_core::error::DomainError;

/// How an entry's text appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntranceStyle {
    /// Full text at once.
    Immediate,
    /// One character per step.
    Typewriter,
    /// One character per step behind a caret; the caret is trimmed at the end.
    TypewriterTrim,
    /// Full text faded in by opacity.
    Fade,
    /// Random glyphs resolving into the text from left to right.
    Scramble,
}

/// How an entry's text leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStyle {
    /// Remove one trailing character per step.
    Trim,
    /// Remove one leading character per step.
    Unreveal,
    /// Fade out by opacity.
    Fade,
    /// Replace characters with random glyphs, then fade out.
    Scramble,
}

/// Lowercases and strips separators so `TypewriterTrim`, `typewriter-trim`
/// and `typewriter_trim` compare equal.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

impl EntranceStyle {
    /// Parses a style name. An empty or blank name selects no style.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` for an unknown name.
    pub fn parse_optional(name: &str) -> Result<Option<Self>, DomainError> {
        if name.trim().is_empty() {
            return Ok(None);
        }
        name.parse().map(Some)
    }

    /// The style's canonical name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Typewriter => "typewriter",
            Self::TypewriterTrim => "typewriter-trim",
            Self::Fade => "fade",
            Self::Scramble => "scramble",
        }
    }
}

impl FromStr for EntranceStyle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "immediate" => Ok(Self::Immediate),
            "typewriter" => Ok(Self::Typewriter),
            "typewritertrim" => Ok(Self::TypewriterTrim),
            "fade" | "fadein" => Ok(Self::Fade),
            "scramble" => Ok(Self::Scramble),
            _ => Err(DomainError::InvalidArgument(format!(
                "unknown entrance style: {s}"
            ))),
        }
    }
}

impl fmt::Display for EntranceStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ExitStyle {
    /// Parses a style name. An empty or blank name selects no style.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` for an unknown name.
    pub fn parse_optional(name: &str) -> Result<Option<Self>, DomainError> {
        if name.trim().is_empty() {
            return Ok(None);
        }
        name.parse().map(Some)
    }

    /// The style's canonical name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trim => "trim",
            Self::Unreveal => "unreveal",
            Self::Fade => "fade",
            Self::Scramble => "scramble",
        }
    }
}

impl FromStr for ExitStyle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "trim" => Ok(Self::Trim),
            "unreveal" => Ok(Self::Unreveal),
            "fade" | "fadeout" => Ok(Self::Fade),
            "scramble" => Ok(Self::Scramble),
            _ => Err(DomainError::InvalidArgument(format!(
                "unknown exit style: {s}"
            ))),
        }
    }
}

impl fmt::Display for ExitStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-playback effect selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayOptions {
    /// Entrance effect; `None` shows the text immediately.
    pub entrance: Option<EntranceStyle>,
    /// Exit effect; `None` leaves the text until the target is hidden.
    pub exit: Option<ExitStyle>,
    /// Total length of the exit effect. When unset, exits run at the fixed
    /// per-step delay from `EffectTimings`.
    pub exit_duration: Option<Duration>,
}

impl PlayOptions {
    /// Builds options from host style names. Empty names select no style.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if either name is unknown.
    pub fn from_names(entrance: &str, exit: &str) -> Result<Self, DomainError> {
        Ok(Self {
            entrance: EntranceStyle::parse_optional(entrance)?,
            exit: ExitStyle::parse_optional(exit)?,
            exit_duration: None,
        })
    }

    /// Sets the entrance effect.
    #[must_use]
    pub fn with_entrance(mut self, entrance: EntranceStyle) -> Self {
        self.entrance = Some(entrance);
        self
    }

    /// Sets the exit effect.
    #[must_use]
    pub fn with_exit(mut self, exit: ExitStyle) -> Self {
        self.exit = Some(exit);
        self
    }

    /// Sets the total exit effect duration.
    #[must_use]
    pub fn with_exit_duration(mut self, duration: Duration) -> Self {
        self.exit_duration = Some(duration);
        self
    }
}
