//! Timed entrance and exit effects.
//!
//! Every effect is a series of display mutations separated by pauses. A
//! pause that observes cancellation ends the effect early with `Cancelled`.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use stagehand_core::display::DisplayTarget;
use stagehand_core::rng::DeterministicRng;
use stagehand_core::scheduler::Scheduler;
use tokio_util::sync::CancellationToken;

use crate::domain::style::{EntranceStyle, ExitStyle};
use crate::domain::timings::{EffectTimings, step_delay};

/// Glyphs scramble frames draw from.
pub(crate) const SCRAMBLE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789#$%&*+?@";

/// Marker returned when a pause observes cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cancelled;

/// Waits on the scheduler unless the session's token fires first.
pub(crate) struct Pacer<'a> {
    scheduler: &'a dyn Scheduler,
    cancel: &'a CancellationToken,
}

impl<'a> Pacer<'a> {
    pub(crate) fn new(scheduler: &'a dyn Scheduler, cancel: &'a CancellationToken) -> Self {
        Self { scheduler, cancel }
    }

    pub(crate) async fn pause(&self, duration: Duration) -> Result<(), Cancelled> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(Cancelled),
            () = self.scheduler.sleep(duration) => Ok(()),
        }
    }
}

/// Everything an effect needs to drive one display target.
pub(crate) struct EffectContext<'a> {
    pub target: &'a dyn DisplayTarget,
    pub pacer: &'a Pacer<'a>,
    pub timings: &'a EffectTimings,
    pub rng: &'a Mutex<dyn DeterministicRng>,
}

/// Renders `text` with the entrance effect. `None` behaves like
/// `Immediate`.
pub(crate) async fn enter(
    ctx: &EffectContext<'_>,
    style: Option<EntranceStyle>,
    text: &str,
) -> Result<(), Cancelled> {
    match style {
        None | Some(EntranceStyle::Immediate) => {
            show(ctx.target, text, 1.0);
            Ok(())
        }
        Some(EntranceStyle::Typewriter) => typewriter(ctx, text, None).await,
        Some(EntranceStyle::TypewriterTrim) => typewriter(ctx, text, Some(ctx.timings.caret)).await,
        Some(EntranceStyle::Fade) => fade_in(ctx, text).await,
        Some(EntranceStyle::Scramble) => scramble_in(ctx, text).await,
    }
}

/// Runs the exit effect for `text`. `None` leaves the display untouched.
pub(crate) async fn exit(
    ctx: &EffectContext<'_>,
    style: Option<ExitStyle>,
    total: Option<Duration>,
    text: &str,
) -> Result<(), Cancelled> {
    match style {
        None => Ok(()),
        Some(ExitStyle::Trim) => remove_characters(ctx, text, total, false).await,
        Some(ExitStyle::Unreveal) => remove_characters(ctx, text, total, true).await,
        Some(ExitStyle::Fade) => {
            let delay = step_delay(
                total,
                usize::from(ctx.timings.fade_steps),
                ctx.timings.fade_step_delay,
            );
            fade_out(ctx, delay).await
        }
        Some(ExitStyle::Scramble) => scramble_out(ctx, text, total).await,
    }
}

fn show(target: &dyn DisplayTarget, text: &str, opacity: f32) {
    target.set_text(text);
    target.set_opacity(opacity);
    target.set_visible(true);
}

async fn typewriter(
    ctx: &EffectContext<'_>,
    text: &str,
    caret: Option<char>,
) -> Result<(), Cancelled> {
    let chars: Vec<char> = text.chars().collect();
    show(ctx.target, "", 1.0);

    for shown in 1..=chars.len() {
        let mut frame: String = chars[..shown].iter().collect();
        if let Some(caret) = caret {
            frame.push(caret);
        }
        ctx.target.set_text(&frame);
        ctx.pacer.pause(ctx.timings.char_delay).await?;
    }

    if caret.is_some() {
        ctx.target.set_text(text);
    }
    Ok(())
}

async fn fade_in(ctx: &EffectContext<'_>, text: &str) -> Result<(), Cancelled> {
    let steps = ctx.timings.fade_steps;
    if steps == 0 {
        show(ctx.target, text, 1.0);
        return Ok(());
    }

    show(ctx.target, text, 0.0);
    for step in 1..=steps {
        ctx.pacer.pause(ctx.timings.fade_step_delay).await?;
        ctx.target.set_opacity(f32::from(step) / f32::from(steps));
    }
    Ok(())
}

async fn fade_out(ctx: &EffectContext<'_>, delay: Duration) -> Result<(), Cancelled> {
    let steps = ctx.timings.fade_steps;
    if steps == 0 {
        ctx.target.set_opacity(0.0);
        return Ok(());
    }

    for step in (0..steps).rev() {
        ctx.pacer.pause(delay).await?;
        ctx.target.set_opacity(f32::from(step) / f32::from(steps));
    }
    Ok(())
}

async fn scramble_in(ctx: &EffectContext<'_>, text: &str) -> Result<(), Cancelled> {
    let chars: Vec<char> = text.chars().collect();
    show(ctx.target, &scrambled(&chars, |_| false, ctx.rng), 1.0);

    for resolved in 1..=chars.len() {
        ctx.pacer.pause(ctx.timings.scramble_step_delay).await?;
        let frame = scrambled(&chars, |i| i < resolved, ctx.rng);
        ctx.target.set_text(&frame);
    }
    Ok(())
}

async fn scramble_out(
    ctx: &EffectContext<'_>,
    text: &str,
    total: Option<Duration>,
) -> Result<(), Cancelled> {
    let chars: Vec<char> = text.chars().collect();
    let (scramble_delay, fade_delay) = match total {
        Some(_) => {
            let steps = chars.len() + usize::from(ctx.timings.fade_steps);
            let delay = step_delay(total, steps, ctx.timings.scramble_step_delay);
            (delay, delay)
        }
        None => (ctx.timings.scramble_step_delay, ctx.timings.fade_step_delay),
    };

    for replaced in 1..=chars.len() {
        ctx.pacer.pause(scramble_delay).await?;
        let frame = scrambled(&chars, |i| i >= replaced, ctx.rng);
        ctx.target.set_text(&frame);
    }
    fade_out(ctx, fade_delay).await
}

async fn remove_characters(
    ctx: &EffectContext<'_>,
    text: &str,
    total: Option<Duration>,
    from_front: bool,
) -> Result<(), Cancelled> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let delay = step_delay(total, len, ctx.timings.char_delay);

    for removed in 1..=len {
        ctx.pacer.pause(delay).await?;
        let remaining = if from_front {
            &chars[removed..]
        } else {
            &chars[..len - removed]
        };
        ctx.target.set_text(&remaining.iter().collect::<String>());
    }
    Ok(())
}

/// Builds one scramble frame: characters for which `keep` holds, and all
/// whitespace, are shown as-is; the rest become random glyphs.
fn scrambled(
    chars: &[char],
    keep: impl Fn(usize) -> bool,
    rng: &Mutex<dyn DeterministicRng>,
) -> String {
    let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            if keep(i) || c.is_whitespace() {
                c
            } else {
                random_glyph(&mut *rng)
            }
        })
        .collect()
}

fn random_glyph(rng: &mut dyn DeterministicRng) -> char {
    let last = SCRAMBLE_ALPHABET.len() - 1;
    let pick = rng.next_u32_range(0, u32::try_from(last).unwrap_or(u32::MAX));
    let index = usize::try_from(pick).map_or(last, |i| i.min(last));
    char::from(SCRAMBLE_ALPHABET[index])
}
