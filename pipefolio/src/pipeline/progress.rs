//! Simulated build progress.

use crate::cancellation::EffectScope;
use crate::reveal::{drive, PacedSequence, RevealOutcome};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// A deterministic percentage counter that climbs by one per tick.
///
/// Counting is a paced reveal of the values `1..=target`, so it shares the
/// scheduler and the cancellation rules of the typing and line sequencers.
#[derive(Debug)]
pub struct ProgressSimulator {
    tick: Duration,
    target: u8,
    progress: Arc<AtomicU8>,
    running: Arc<AtomicBool>,
    scope: EffectScope,
}

impl ProgressSimulator {
    /// Creates a simulator counting to `target`, one step per `tick`.
    #[must_use]
    pub fn new(tick: Duration, target: u8) -> Self {
        Self {
            tick,
            target,
            progress: Arc::new(AtomicU8::new(0)),
            running: Arc::new(AtomicBool::new(false)),
            scope: EffectScope::new("build-progress"),
        }
    }

    /// Resets the counter to 0 and starts counting.
    ///
    /// `on_progress` sees every value from 1 to the target in order.
    /// `on_complete` fires once when the target is reached, and never for a
    /// run that was cancelled or restarted first.
    pub fn start<P, C>(&self, mut on_progress: P, on_complete: C)
    where
        P: FnMut(u8) + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        self.scope.reset("build restarted");
        self.progress.store(0, Ordering::SeqCst);
        self.running.store(true, Ordering::SeqCst);

        let mut sequence = PacedSequence::uniform(1..=self.target, self.tick);
        let progress = self.progress.clone();
        let running = self.running.clone();
        let target = self.target;
        debug!(goal = target, tick = ?self.tick, "Build simulation started");

        self.scope.spawn("progress", move |token| async move {
            let outcome = drive(&mut sequence, &token, |_, &value| {
                if token.is_cancelled() {
                    return;
                }
                progress.store(value, Ordering::SeqCst);
                on_progress(value);
            })
            .await;

            if outcome == RevealOutcome::Completed {
                running.store(false, Ordering::SeqCst);
                debug!(goal = target, "Build simulation complete");
                on_complete();
            }
        });
    }

    /// Stops counting. The counter keeps its last value.
    pub fn cancel(&self) {
        self.scope.reset("build cancelled");
        self.running.store(false, Ordering::SeqCst);
    }

    /// The current value.
    #[must_use]
    pub fn progress(&self) -> u8 {
        self.progress.load(Ordering::SeqCst)
    }

    /// Returns true while counting.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// The value at which counting completes.
    #[must_use]
    pub const fn target(&self) -> u8 {
        self.target
    }

    /// Nominal time from start to completion.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.tick * u32::from(self.target)
    }
}
