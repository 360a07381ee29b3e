//! Step timings for entrance and exit effects.

use std::time::Duration;

/// Fixed per-step delays that drive every effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectTimings {
    /// Delay between characters for typewriter, trim and unreveal effects.
    pub char_delay: Duration,
    /// Number of opacity steps in a fade.
    pub fade_steps: u16,
    /// Delay between opacity steps.
    pub fade_step_delay: Duration,
    /// Delay between scramble frames.
    pub scramble_step_delay: Duration,
    /// Glyph trailing the revealed text in the typewriter-trim entrance.
    pub caret: char,
}

impl Default for EffectTimings {
    fn default() -> Self {
        Self {
            char_delay: Duration::from_millis(40),
            fade_steps: 10,
            fade_step_delay: Duration::from_millis(30),
            scramble_step_delay: Duration::from_millis(30),
            caret: '_',
        }
    }
}

/// Spreads `total` evenly over `steps`, or falls back to `fixed` when no
/// total is requested.
pub(crate) fn step_delay(total: Option<Duration>, steps: usize, fixed: Duration) -> Duration {
    match total {
        Some(total) if steps > 0 => total / u32::try_from(steps).unwrap_or(u32::MAX),
        _ => fixed,
    }
}
