//! Test display — a `DisplayTarget` that records every mutation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use stagehand_core::display::DisplayTarget;

use crate::scheduler::VirtualScheduler;

/// A single display mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayOp {
    /// `set_text` was called.
    Text(String),
    /// `set_visible` was called.
    Visible(bool),
    /// `set_opacity` was called.
    Opacity(f32),
}

/// A display target that records each call stamped with the virtual time of
/// the scheduler driving the playback.
#[derive(Debug)]
pub struct RecordingDisplay {
    timeline: Arc<VirtualScheduler>,
    ops: Mutex<Vec<(Duration, DisplayOp)>>,
    alive: AtomicBool,
}

impl RecordingDisplay {
    /// Create a display stamped by `timeline`.
    #[must_use]
    pub fn new(timeline: Arc<VirtualScheduler>) -> Self {
        Self {
            timeline,
            ops: Mutex::new(Vec::new()),
            alive: AtomicBool::new(true),
        }
    }

    /// Mark the display as destroyed so `is_alive` reports `false`.
    pub fn destroy(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Snapshot of all recorded mutations.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn ops(&self) -> Vec<(Duration, DisplayOp)> {
        self.ops.lock().unwrap().clone()
    }

    /// Every text value set, in order.
    pub fn texts(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|(_, op)| match op {
                DisplayOp::Text(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Every opacity value set, in order.
    pub fn opacities(&self) -> Vec<f32> {
        self.ops()
            .into_iter()
            .filter_map(|(_, op)| match op {
                DisplayOp::Opacity(opacity) => Some(opacity),
                _ => None,
            })
            .collect()
    }

    /// Every visibility change with its virtual timestamp.
    pub fn visibility(&self) -> Vec<(Duration, bool)> {
        self.ops()
            .into_iter()
            .filter_map(|(at, op)| match op {
                DisplayOp::Visible(visible) => Some((at, visible)),
                _ => None,
            })
            .collect()
    }

    /// Whether the display is currently shown.
    pub fn is_visible(&self) -> bool {
        let visibility = self.visibility();
        visibility.last().is_some_and(|(_, visible)| *visible)
    }

    fn record(&self, op: DisplayOp) {
        let at = self.timeline.elapsed();
        self.ops.lock().unwrap().push((at, op));
    }
}

impl DisplayTarget for RecordingDisplay {
    fn set_text(&self, text: &str) {
        self.record(DisplayOp::Text(text.to_owned()));
    }

    fn set_visible(&self, visible: bool) {
        self.record(DisplayOp::Visible(visible));
    }

    fn set_opacity(&self, opacity: f32) {
        self.record(DisplayOp::Opacity(opacity));
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}
