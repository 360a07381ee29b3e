//! Scheduler abstraction for timed effect steps.

use std::time::Duration;

use async_trait::async_trait;

/// Suspends the calling task for a real-time delay.
///
/// Playback sessions route every wait through this trait so tests can run
/// on a virtual timeline.
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Resume after `duration` has elapsed.
    async fn sleep(&self, duration: Duration);
}

/// Production scheduler backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

#[async_trait]
impl Scheduler for TokioScheduler {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tokio_scheduler_waits_at_least_the_duration() {
        // Arrange
        let scheduler = TokioScheduler;
        let started = tokio::time::Instant::now();

        // Act
        scheduler.sleep(Duration::from_millis(5)).await;

        // Assert
        assert!(started.elapsed() >= Duration::from_millis(5));
    }
}
