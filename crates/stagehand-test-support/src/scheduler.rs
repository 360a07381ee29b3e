//! Test scheduler — a virtual timeline for playback tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use stagehand_core::scheduler::Scheduler;

/// A scheduler that never waits in real time. Each `sleep` advances a
/// virtual clock and is recorded, then yields once to the runtime so other
/// tasks (and cancellation) get a chance to run.
#[derive(Debug, Default)]
pub struct VirtualScheduler {
    elapsed: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

impl VirtualScheduler {
    /// Create a scheduler at virtual time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total virtual time slept so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock().unwrap()
    }

    /// Every requested delay, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Scheduler for VirtualScheduler {
    async fn sleep(&self, duration: Duration) {
        {
            let mut elapsed = self.elapsed.lock().unwrap();
            *elapsed += duration;
            self.sleeps.lock().unwrap().push(duration);
        }
        tokio::task::yield_now().await;
    }
}
