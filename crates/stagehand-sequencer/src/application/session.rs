//! A single playback of one dialogue sequence.

use std::sync::{Arc, Mutex};

use stagehand_core::display::DisplayTarget;
use stagehand_core::rng::DeterministicRng;
use stagehand_core::scheduler::Scheduler;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::effects::{self, Cancelled, EffectContext, Pacer};
use crate::domain::entry::DialogueEntry;
use crate::domain::status::{PlaybackOutcome, PlaybackPhase, PlaybackStatus};
use crate::domain::style::PlayOptions;
use crate::domain::timings::EffectTimings;

/// Transient state for one playback: the entries being played, the target
/// they are played onto, the selected effects and the cancellation token.
///
/// Built by `Sequencer::prepare`; consumed by `run`.
pub struct PlaybackSession {
    id: Uuid,
    sequence_key: String,
    entries: Vec<DialogueEntry>,
    target: Arc<dyn DisplayTarget>,
    options: PlayOptions,
    timings: EffectTimings,
    scheduler: Arc<dyn Scheduler>,
    rng: Arc<Mutex<dyn DeterministicRng>>,
    cancel: CancellationToken,
    status: watch::Sender<PlaybackStatus>,
}

impl std::fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("id", &self.id)
            .field("sequence_key", &self.sequence_key)
            .field("entries", &self.entries.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl PlaybackSession {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        sequence_key: String,
        entries: Vec<DialogueEntry>,
        target: Arc<dyn DisplayTarget>,
        options: PlayOptions,
        timings: EffectTimings,
        scheduler: Arc<dyn Scheduler>,
        rng: Arc<Mutex<dyn DeterministicRng>>,
    ) -> Self {
        let (status, _) = watch::channel(PlaybackStatus::idle());
        Self {
            id: Uuid::new_v4(),
            sequence_key,
            entries,
            target,
            options,
            timings,
            scheduler,
            rng,
            cancel: CancellationToken::new(),
            status,
        }
    }

    /// Identifier used to correlate this session's log lines.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// A token that stops this session when cancelled.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// A receiver that observes every phase change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PlaybackStatus> {
        self.status.subscribe()
    }

    /// Plays every entry in order. `observer` is called once per entry, with
    /// its index, after the entry's post-delay has elapsed and the target is
    /// hidden.
    ///
    /// On cancellation the target is hidden and the session stops without
    /// notifying the observer for the interrupted entry.
    #[instrument(skip_all, fields(session_id = %self.id, sequence = %self.sequence_key))]
    pub async fn run<F>(self, mut observer: F) -> PlaybackOutcome
    where
        F: FnMut(usize, &DialogueEntry) + Send,
    {
        info!(entries = self.entries.len(), "playback started");

        for (index, entry) in self.entries.iter().enumerate() {
            if let Err(Cancelled) = self.play_entry(index, entry).await {
                self.target.set_visible(false);
                self.publish(index, PlaybackPhase::Cancelled);
                info!(completed_entries = index, "playback cancelled");
                return PlaybackOutcome::Cancelled {
                    completed_entries: index,
                };
            }
            observer(index, entry);
        }

        let entries = self.entries.len();
        self.publish(entries.saturating_sub(1), PlaybackPhase::Done);
        info!(entries, "playback finished");
        PlaybackOutcome::Completed { entries }
    }

    async fn play_entry(&self, index: usize, entry: &DialogueEntry) -> Result<(), Cancelled> {
        if self.cancel.is_cancelled() {
            return Err(Cancelled);
        }

        let pacer = Pacer::new(self.scheduler.as_ref(), &self.cancel);
        let ctx = EffectContext {
            target: self.target.as_ref(),
            pacer: &pacer,
            timings: &self.timings,
            rng: self.rng.as_ref(),
        };

        self.publish(index, PlaybackPhase::Entering);
        effects::enter(&ctx, self.options.entrance, &entry.text).await?;

        self.publish(index, PlaybackPhase::Holding);
        pacer.pause(entry.visible_duration).await?;

        self.publish(index, PlaybackPhase::Exiting);
        effects::exit(
            &ctx,
            self.options.exit,
            self.options.exit_duration,
            &entry.text,
        )
        .await?;

        self.publish(index, PlaybackPhase::Advancing);
        pacer.pause(entry.post_delay).await?;
        self.target.set_visible(false);
        Ok(())
    }

    fn publish(&self, index: usize, phase: PlaybackPhase) {
        debug!(index, ?phase, "phase changed");
        self.status.send_replace(PlaybackStatus { index, phase });
    }
}
