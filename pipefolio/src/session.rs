//! First-visit welcome notice.

use crate::cancellation::EffectScope;
use crate::contact::KeyValueStore;
use crate::errors::StorageError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Store key remembering that the notice was dismissed.
pub const SEEN_KEY: &str = "hasSeenWelcomeModal";

/// Decides whether the one-time welcome notice appears.
///
/// The flag is read once when the gate loads. Dismissing writes it through
/// immediately, so later visits skip the notice.
pub struct WelcomeGate {
    store: Arc<dyn KeyValueStore>,
    seen: AtomicBool,
    visible: Arc<AtomicBool>,
    scope: EffectScope,
}

impl WelcomeGate {
    /// Reads the seen flag from `store`. An unreadable store counts as unseen.
    #[must_use]
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let seen = match store.get(SEEN_KEY) {
            Ok(value) => value.is_some(),
            Err(err) => {
                warn!(error = %err, "Could not read welcome flag");
                false
            }
        };
        Self {
            store,
            seen: AtomicBool::new(seen),
            visible: Arc::new(AtomicBool::new(false)),
            scope: EffectScope::new("welcome-gate"),
        }
    }

    /// Returns true if the notice has never been dismissed.
    #[must_use]
    pub fn should_show(&self) -> bool {
        !self.seen.load(Ordering::SeqCst)
    }

    /// Returns true while the notice is up.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    /// Shows the notice after `delay`, calling `on_show` when it appears.
    ///
    /// Does nothing if the notice was already dismissed.
    pub fn schedule<F>(&self, delay: Duration, on_show: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if !self.should_show() {
            return;
        }
        let visible = self.visible.clone();
        self.scope.spawn("welcome-delay", move |token| async move {
            tokio::select! {
                biased;
                () = token.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    if !token.is_cancelled() {
                        visible.store(true, Ordering::SeqCst);
                        debug!("Welcome notice shown");
                        on_show();
                    }
                }
            }
        });
    }

    /// Hides the notice and remembers the dismissal.
    pub fn dismiss(&self) -> Result<(), StorageError> {
        self.scope.cancel_all("welcome dismissed");
        self.visible.store(false, Ordering::SeqCst);
        self.seen.store(true, Ordering::SeqCst);
        self.store.set(SEEN_KEY, "true")
    }
}

impl std::fmt::Debug for WelcomeGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WelcomeGate")
            .field("seen", &self.seen.load(Ordering::SeqCst))
            .field("visible", &self.is_visible())
            .finish_non_exhaustive()
    }
}
