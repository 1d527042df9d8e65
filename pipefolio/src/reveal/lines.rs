//! Ordered line-by-line transcript reveal.

use super::paced::{drive, PacedItem, PacedSequence, RevealOutcome};
use crate::cancellation::EffectScope;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

type ItemCallback<T> = Arc<dyn Fn(usize, &T) + Send + Sync>;
type FinishedCallback = Arc<dyn Fn() + Send + Sync>;

/// Reveals a scripted list of lines into a transcript, strictly in order.
///
/// The transcript is shared with interactive output: [`LineRevealSequencer::append`]
/// adds lines directly, so a terminal can keep using the same buffer after
/// its boot script finishes.
pub struct LineRevealSequencer<T> {
    script: Vec<PacedItem<T>>,
    restart_index: usize,
    transcript: Arc<RwLock<Vec<T>>>,
    position: Arc<AtomicUsize>,
    revealing: Arc<AtomicBool>,
    on_item: Option<ItemCallback<T>>,
    on_finished: Option<FinishedCallback>,
    scope: EffectScope,
}

impl<T> LineRevealSequencer<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a sequencer for `script`. Nothing is revealed until [`start`](Self::start).
    #[must_use]
    pub fn new(script: Vec<PacedItem<T>>) -> Self {
        Self {
            script,
            restart_index: 0,
            transcript: Arc::new(RwLock::new(Vec::new())),
            position: Arc::new(AtomicUsize::new(0)),
            revealing: Arc::new(AtomicBool::new(false)),
            on_item: None,
            on_finished: None,
            scope: EffectScope::new("line-reveal"),
        }
    }

    /// Sets the script index that [`clear_and_restart`](Self::clear_and_restart) resumes from.
    ///
    /// Setting it to the script length makes a reset clear the screen without
    /// replaying anything.
    #[must_use]
    pub fn with_restart_index(mut self, index: usize) -> Self {
        self.restart_index = index.min(self.script.len());
        self
    }

    /// Called after each scripted line is appended.
    #[must_use]
    pub fn on_item<F>(mut self, callback: F) -> Self
    where
        F: Fn(usize, &T) + Send + Sync + 'static,
    {
        self.on_item = Some(Arc::new(callback));
        self
    }

    /// Called once each time a run reaches the end of the script.
    #[must_use]
    pub fn on_finished<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_finished = Some(Arc::new(callback));
        self
    }

    /// Plays the script from the beginning.
    pub fn start(&self) {
        self.run_from(0);
    }

    /// Cancels pending reveals and empties the transcript.
    pub fn clear(&self) {
        self.cancel();
        self.transcript.write().clear();
    }

    /// Empties the transcript and replays from the restart index.
    pub fn clear_and_restart(&self) {
        self.scope.reset("transcript cleared");
        self.transcript.write().clear();
        self.run_from(self.restart_index);
    }

    /// Appends a line immediately, outside the script.
    pub fn append(&self, line: T) {
        self.transcript.write().push(line);
    }

    /// Stops revealing. Lines already shown stay.
    pub fn cancel(&self) {
        self.scope.reset("reveal cancelled");
        self.revealing.store(false, Ordering::SeqCst);
    }

    /// A copy of the lines shown so far.
    #[must_use]
    pub fn transcript(&self) -> Vec<T> {
        self.transcript.read().clone()
    }

    /// Number of lines shown so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transcript.read().len()
    }

    /// Returns true if nothing is shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transcript.read().is_empty()
    }

    /// Index of the next scripted line.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position.load(Ordering::SeqCst)
    }

    /// Returns true while scripted lines are still pending.
    #[must_use]
    pub fn is_revealing(&self) -> bool {
        self.revealing.load(Ordering::SeqCst)
    }

    fn run_from(&self, index: usize) {
        self.scope.reset("reveal restarted");

        let mut sequence = PacedSequence::new(self.script.clone()).with_start_index(index);
        self.position.store(sequence.position(), Ordering::SeqCst);
        self.revealing.store(true, Ordering::SeqCst);
        debug!(from = index, total = sequence.len(), "Starting line reveal");

        let transcript = self.transcript.clone();
        let position = self.position.clone();
        let revealing = self.revealing.clone();
        let on_item = self.on_item.clone();
        let on_finished = self.on_finished.clone();

        self.scope.spawn("line-reveal", move |token| async move {
            let outcome = drive(&mut sequence, &token, |i, line| {
                {
                    let mut lines = transcript.write();
                    if token.is_cancelled() {
                        return;
                    }
                    lines.push(line.clone());
                    position.store(i + 1, Ordering::SeqCst);
                }
                if let Some(callback) = &on_item {
                    callback(i, line);
                }
            })
            .await;

            if outcome == RevealOutcome::Completed {
                revealing.store(false, Ordering::SeqCst);
                if let Some(callback) = &on_finished {
                    callback();
                }
            }
        });
    }
}

impl<T> std::fmt::Debug for LineRevealSequencer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineRevealSequencer")
            .field("script_len", &self.script.len())
            .field("restart_index", &self.restart_index)
            .field("position", &self.position.load(Ordering::SeqCst))
            .field("revealing", &self.revealing.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn script() -> Vec<PacedItem<&'static str>> {
        vec![
            PacedItem::after_ms("$ ssh portfolio", 800),
            PacedItem::after_ms("Connecting...", 800),
            PacedItem::after_ms("Connection established.", 800),
            PacedItem::after_ms(" ", 100),
        ]
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveals_in_order_with_delays() {
        let seq = LineRevealSequencer::new(script());
        seq.start();

        advance(799).await;
        assert!(seq.is_empty());
        advance(2).await;
        assert_eq!(seq.transcript(), vec!["$ ssh portfolio"]);

        advance(1600).await;
        assert_eq!(seq.len(), 3);
        assert!(seq.is_revealing());

        advance(100).await;
        assert_eq!(seq.len(), 4);
        assert!(!seq.is_revealing());
        assert_eq!(seq.position(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_item_and_finished_callbacks() {
        let items = Arc::new(RwLock::new(Vec::new()));
        let finished = Arc::new(AtomicUsize::new(0));
        let i = items.clone();
        let f = finished.clone();

        let seq = LineRevealSequencer::new(script())
            .on_item(move |index, _| i.write().push(index))
            .on_finished(move || {
                f.fetch_add(1, Ordering::SeqCst);
            });
        seq.start();

        advance(5000).await;
        assert_eq!(*items.read(), vec![0, 1, 2, 3]);
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_and_restart_from_restart_index() {
        let seq = LineRevealSequencer::new(script()).with_restart_index(2);
        seq.start();
        advance(5000).await;
        seq.append("$ help");
        assert_eq!(seq.len(), 5);

        seq.clear_and_restart();
        assert!(seq.is_empty());
        assert_eq!(seq.position(), 2);

        advance(950).await;
        assert_eq!(seq.transcript(), vec!["Connection established.", " "]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_at_end_only_clears() {
        let seq = LineRevealSequencer::new(script()).with_restart_index(usize::MAX);
        seq.start();
        advance(5000).await;

        seq.clear_and_restart();
        advance(5000).await;
        assert!(seq.is_empty());
        assert!(!seq.is_revealing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_mid_sequence_drops_pending_lines() {
        let seq = LineRevealSequencer::new(script()).with_restart_index(4);
        seq.start();
        advance(900).await;
        assert_eq!(seq.len(), 1);

        seq.clear_and_restart();
        advance(5000).await;
        assert!(seq.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_stops_everything() {
        let seq = LineRevealSequencer::new(script());
        seq.start();
        advance(1_700).await;
        assert_eq!(seq.len(), 2);

        seq.clear();
        assert!(seq.is_empty());
        assert!(!seq.is_revealing());
        advance(5_000).await;
        assert!(seq.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_callbacks_after_drop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let seq = LineRevealSequencer::new(script()).on_item(move |_, _| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        seq.start();

        advance(900).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        drop(seq);
        advance(5000).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
