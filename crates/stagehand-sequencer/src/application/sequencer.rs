//! The sequencer service.

use std::sync::{Arc, Mutex};

use stagehand_core::display::DisplayTarget;
use stagehand_core::error::DomainError;
use stagehand_core::rng::DeterministicRng;
use stagehand_core::scheduler::Scheduler;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::session::PlaybackSession;
use crate::domain::catalog::Catalog;
use crate::domain::entry::DialogueEntry;
use crate::domain::status::{PlaybackOutcome, PlaybackStatus};
use crate::domain::style::PlayOptions;
use crate::domain::timings::EffectTimings;

/// Plays sequences from an injected catalog.
pub struct Sequencer {
    catalog: Arc<Catalog>,
    scheduler: Arc<dyn Scheduler>,
    rng: Arc<Mutex<dyn DeterministicRng>>,
    timings: EffectTimings,
}

impl std::fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequencer")
            .field("sequences", &self.catalog.len())
            .field("timings", &self.timings)
            .finish_non_exhaustive()
    }
}

impl Sequencer {
    /// Creates a sequencer with default effect timings.
    #[must_use]
    pub fn new(
        catalog: Arc<Catalog>,
        scheduler: Arc<dyn Scheduler>,
        rng: Arc<Mutex<dyn DeterministicRng>>,
    ) -> Self {
        Self {
            catalog,
            scheduler,
            rng,
            timings: EffectTimings::default(),
        }
    }

    /// Replaces the effect timings.
    #[must_use]
    pub fn with_timings(mut self, timings: EffectTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Returns an owned copy of the named sequence without playing it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingSequence` if no such sequence exists.
    pub fn get(&self, key: &str) -> Result<Vec<DialogueEntry>, DomainError> {
        self.catalog
            .sequence(key)
            .map(<[DialogueEntry]>::to_vec)
            .ok_or_else(|| DomainError::MissingSequence(key.to_owned()))
    }

    /// Builds a session for the named sequence without starting it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingSequence` if no such sequence exists and
    /// `DomainError::InvalidDisplayTarget` if the target is no longer alive.
    pub fn prepare(
        &self,
        key: &str,
        target: Arc<dyn DisplayTarget>,
        options: PlayOptions,
    ) -> Result<PlaybackSession, DomainError> {
        let entries = self.get(key)?;
        if !target.is_alive() {
            return Err(DomainError::InvalidDisplayTarget(format!(
                "cannot play {key}: display target is not alive"
            )));
        }

        Ok(PlaybackSession::new(
            key.to_owned(),
            entries,
            target,
            options,
            self.timings,
            Arc::clone(&self.scheduler),
            Arc::clone(&self.rng),
        ))
    }

    /// Starts the named sequence on a new tokio task.
    ///
    /// # Errors
    ///
    /// See [`Sequencer::prepare`].
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[instrument(skip(self, target, observer))]
    pub fn play<F>(
        &self,
        key: &str,
        target: Arc<dyn DisplayTarget>,
        options: PlayOptions,
        observer: F,
    ) -> Result<PlaybackHandle, DomainError>
    where
        F: FnMut(usize, &DialogueEntry) + Send + 'static,
    {
        let session = self.prepare(key, target, options)?;
        let id = session.id();
        let cancel = session.cancellation_token();
        let status = session.subscribe();
        let task = tokio::spawn(session.run(observer));
        debug!(session_id = %id, "playback task spawned");

        Ok(PlaybackHandle {
            id,
            cancel,
            status,
            task,
        })
    }

    /// Plays the named sequence on the calling task and returns when it
    /// finishes.
    ///
    /// # Errors
    ///
    /// See [`Sequencer::prepare`].
    pub async fn run<F>(
        &self,
        key: &str,
        target: Arc<dyn DisplayTarget>,
        options: PlayOptions,
        observer: F,
    ) -> Result<PlaybackOutcome, DomainError>
    where
        F: FnMut(usize, &DialogueEntry) + Send,
    {
        let session = self.prepare(key, target, options)?;
        Ok(session.run(observer).await)
    }
}

/// Control over a spawned playback.
#[derive(Debug)]
pub struct PlaybackHandle {
    id: Uuid,
    cancel: CancellationToken,
    status: watch::Receiver<PlaybackStatus>,
    task: JoinHandle<PlaybackOutcome>,
}

impl PlaybackHandle {
    /// The session identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Stops the playback at its next step and hides the target.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A clone of the session's cancellation token.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// The most recently published status.
    #[must_use]
    pub fn status(&self) -> PlaybackStatus {
        *self.status.borrow()
    }

    /// A receiver that observes every later status change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PlaybackStatus> {
        self.status.clone()
    }

    /// Waits for the playback to finish.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PlaybackFailed` if the task panicked or was
    /// aborted.
    pub async fn wait(self) -> Result<PlaybackOutcome, DomainError> {
        self.task
            .await
            .map_err(|e| DomainError::PlaybackFailed(e.to_string()))
    }
}
