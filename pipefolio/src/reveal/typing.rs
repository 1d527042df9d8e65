//! Per-character typing effect.

use super::paced::{drive, PacedItem, PacedSequence, RevealOutcome};
use crate::cancellation::EffectScope;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Returns every growing prefix of `text`, one character at a time.
///
/// Prefixes always end on a character boundary.
pub fn typing_frames(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.char_indices()
        .map(move |(offset, ch)| &text[..offset + ch.len_utf8()])
}

/// Builds the paced sequence of prefix end offsets for `text`.
fn frame_sequence(text: &str, per_char: Duration, start_delay: Duration) -> PacedSequence<usize> {
    let items = text
        .char_indices()
        .enumerate()
        .map(|(i, (offset, ch))| {
            let delay = if i == 0 { start_delay + per_char } else { per_char };
            PacedItem::new(offset + ch.len_utf8(), delay)
        })
        .collect();
    PacedSequence::new(items)
}

/// Reveals a source string one character per tick into a display buffer.
///
/// Starting again, cancelling, or dropping the sequencer cancels the pending
/// ticks of the previous run before anything else touches the buffer.
#[derive(Debug)]
pub struct TypingSequencer {
    per_char: Duration,
    start_delay: Duration,
    display: Arc<RwLock<String>>,
    typing: Arc<AtomicBool>,
    scope: EffectScope,
}

impl TypingSequencer {
    /// Creates a sequencer typing one character every `per_char`.
    #[must_use]
    pub fn new(per_char: Duration) -> Self {
        Self {
            per_char,
            start_delay: Duration::ZERO,
            display: Arc::new(RwLock::new(String::new())),
            typing: Arc::new(AtomicBool::new(false)),
            scope: EffectScope::new("typing"),
        }
    }

    /// Waits `delay` before the first character of each run.
    #[must_use]
    pub const fn with_start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }

    /// Types `text`, calling `on_complete` once the full string is shown.
    pub fn start<C>(&self, text: impl Into<String>, on_complete: C)
    where
        C: FnOnce() + Send + 'static,
    {
        self.start_with(text, |_| {}, on_complete);
    }

    /// Types `text`, calling `on_frame` with every prefix and `on_complete` at the end.
    ///
    /// The completion callback fires exactly once per run, and never for a run
    /// that was cancelled or restarted.
    pub fn start_with<P, C>(&self, text: impl Into<String>, mut on_frame: P, on_complete: C)
    where
        P: FnMut(&str) + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        self.scope.reset("typing restarted");
        self.display.write().clear();

        let text = text.into();
        let mut sequence = frame_sequence(&text, self.per_char, self.start_delay);
        self.typing.store(true, Ordering::SeqCst);

        let display = self.display.clone();
        let typing = self.typing.clone();

        self.scope.spawn("typing", move |token| async move {
            let outcome = drive(&mut sequence, &token, |_, &end| {
                let mut buffer = display.write();
                if token.is_cancelled() {
                    return;
                }
                buffer.clear();
                buffer.push_str(&text[..end]);
                on_frame(&buffer);
            })
            .await;

            if outcome == RevealOutcome::Completed {
                typing.store(false, Ordering::SeqCst);
                trace!(chars = text.chars().count(), "Typing complete");
                on_complete();
            }
        });
    }

    /// The prefix currently shown.
    #[must_use]
    pub fn displayed(&self) -> String {
        self.display.read().clone()
    }

    /// Returns true while a run is in progress.
    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.typing.load(Ordering::SeqCst)
    }

    /// Stops the current run, keeping whatever prefix is already shown.
    pub fn cancel(&self) {
        self.scope.reset("typing cancelled");
        self.typing.store(false, Ordering::SeqCst);
    }
}
