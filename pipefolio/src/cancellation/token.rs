//! Cancellation token for cooperative cancellation.

use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;
use tracing::{trace, warn};

/// A callback run once when a token is cancelled.
pub type CancelCallback = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct Inner {
    reason: Option<String>,
    pending: Vec<CancelCallback>,
}

/// A one-shot cancellation signal for timer-driven effects.
///
/// The first [`cancel`](Self::cancel) wins; later calls are no-ops and keep
/// the original reason.
#[derive(Default)]
pub struct CancellationToken {
    flag: AtomicBool,
    inner: Mutex<Inner>,
    wake: Notify,
}

fn run_guarded(callback: CancelCallback) {
    if let Err(panic) = catch_unwind(AssertUnwindSafe(callback)) {
        warn!(?panic, "Cancel callback panicked");
    }
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels with `reason`, running every registered callback once.
    ///
    /// Callbacks run outside the token's lock. A panicking callback is logged
    /// and the rest still run.
    pub fn cancel(&self, reason: impl Into<String>) {
        let callbacks = {
            let mut inner = self.inner.lock();
            if inner.reason.is_some() {
                return;
            }
            let reason = reason.into();
            trace!(%reason, "Token cancelled");
            inner.reason = Some(reason);
            self.flag.store(true, Ordering::SeqCst);
            std::mem::take(&mut inner.pending)
        };
        self.wake.notify_waiters();
        callbacks.into_iter().for_each(run_guarded);
    }

    /// Runs `callback` on cancellation, or right away if already cancelled.
    pub fn on_cancel<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let callback: CancelCallback = Box::new(callback);
        let mut inner = self.inner.lock();
        if inner.reason.is_none() {
            inner.pending.push(callback);
            return;
        }
        drop(inner);
        run_guarded(callback);
    }

    /// Returns true once cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Why the token was cancelled.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        self.inner.lock().reason.clone()
    }

    /// Completes once the token is cancelled.
    pub async fn cancelled(&self) {
        let notified = self.wake.notified();
        tokio::pin!(notified);
        // Register before reading the flag so a cancel in between still wakes us.
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("CancellationToken")
            .field("reason", &inner.reason)
            .field("pending_callbacks", &inner.pending.len())
            .finish()
    }
}
