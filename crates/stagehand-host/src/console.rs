//! A `DisplayTarget` that renders onto the terminal.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use stagehand_core::display::DisplayTarget;

#[derive(Debug)]
struct ConsoleState {
    text: String,
    visible: bool,
    opacity: f32,
}

/// Renders the current line in place on stdout. Opacity below one half is
/// drawn dimmed.
#[derive(Debug)]
pub struct ConsoleDisplay {
    state: Mutex<ConsoleState>,
}

impl ConsoleDisplay {
    /// Creates a hidden, empty display.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ConsoleState {
                text: String::new(),
                visible: false,
                opacity: 1.0,
            }),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut ConsoleState)) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let was_visible = state.visible;
        apply(&mut state);

        let mut stdout = std::io::stdout().lock();
        let written = if state.visible {
            write!(stdout, "\r\x1b[2K{}", render(&state))
        } else if was_visible {
            writeln!(stdout)
        } else {
            Ok(())
        };
        if written.and_then(|()| stdout.flush()).is_err() {
            tracing::debug!("console display write failed");
        }
    }
}

impl Default for ConsoleDisplay {
    fn default() -> Self {
        Self::new()
    }
}

fn render(state: &ConsoleState) -> String {
    if state.opacity < 0.5 {
        format!("\x1b[2m{}\x1b[0m", state.text)
    } else {
        state.text.clone()
    }
}

impl DisplayTarget for ConsoleDisplay {
    fn set_text(&self, text: &str) {
        self.update(|state| text.clone_into(&mut state.text));
    }

    fn set_visible(&self, visible: bool) {
        self.update(|state| state.visible = visible);
    }

    fn set_opacity(&self, opacity: f32) {
        self.update(|state| state.opacity = opacity.clamp(0.0, 1.0));
    }
}
