//! Effect scope owning the timer tasks of one view activation.

use super::CancellationToken;
use parking_lot::{Mutex, RwLock};
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// A group of timer-driven tasks that live and die together.
///
/// A scope corresponds to one mounted view (a stage, a terminal, a form).
/// Resetting the scope is a restart: every task spawned so far is cancelled
/// and aborted, and later spawns receive a fresh token. Dropping the scope is
/// an unmount.
pub struct EffectScope {
    /// Name used in logs.
    name: String,
    /// Token handed to tasks spawned in the current activation.
    token: RwLock<Arc<CancellationToken>>,
    /// Handles to spawned tasks.
    handles: Mutex<Vec<(String, JoinHandle<()>)>>,
}

impl EffectScope {
    /// Creates a new, empty scope.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: RwLock::new(Arc::new(CancellationToken::new())),
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Returns the scope name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the token of the current activation.
    #[must_use]
    pub fn token(&self) -> Arc<CancellationToken> {
        self.token.read().clone()
    }

    /// Spawns a task in the current activation.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F, Fut>(&self, name: &str, task: F)
    where
        F: FnOnce(Arc<CancellationToken>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = self.token();
        let handle = tokio::spawn(task(token));
        trace!(scope = %self.name, task = name, "Spawned effect");

        let mut handles = self.handles.lock();
        handles.retain(|(_, h)| !h.is_finished());
        handles.push((name.to_string(), handle));
    }

    /// Cancels every task and arms a fresh token for subsequent spawns.
    pub fn reset(&self, reason: &str) {
        let previous = {
            let mut token = self.token.write();
            std::mem::replace(&mut *token, Arc::new(CancellationToken::new()))
        };
        previous.cancel(reason);
        self.abort_all(reason);
    }

    /// Cancels every task without re-arming.
    pub fn cancel_all(&self, reason: &str) {
        self.token.read().cancel(reason);
        self.abort_all(reason);
    }

    /// Returns whether the current activation has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.read().is_cancelled()
    }

    /// Returns the number of spawned tasks that have not finished.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.handles
            .lock()
            .iter()
            .filter(|(_, h)| !h.is_finished())
            .count()
    }

    fn abort_all(&self, reason: &str) {
        let handles: Vec<_> = std::mem::take(&mut *self.handles.lock());
        if handles.is_empty() {
            return;
        }
        debug!(scope = %self.name, reason, count = handles.len(), "Cancelling effects");
        for (_, handle) in handles {
            handle.abort();
        }
    }
}

impl Drop for EffectScope {
    fn drop(&mut self) {
        self.cancel_all("scope dropped");
    }
}

impl std::fmt::Debug for EffectScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectScope")
            .field("name", &self.name)
            .field("active_count", &self.active_count())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
