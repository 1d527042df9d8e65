//! The contact form and its submission state machine.

use super::{ContactMessage, DailyRateLimiter, MessageSender, RateLimitRecord};
use crate::cancellation::EffectScope;
use crate::errors::ContactError;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Where the form is in its submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitState {
    /// Accepting input.
    #[default]
    Ready,
    /// A send is in flight.
    Submitting,
    /// The last send succeeded. Reverts to `Ready` after the acknowledgement window.
    Sent,
}

/// The monitor-stage contact form.
///
/// A submission checks the daily limit first; a blocked submission never
/// reaches the sender. Only successful sends count against the limit. A
/// failed send keeps the visitor's input.
pub struct ContactForm {
    fields: Mutex<ContactMessage>,
    state: Arc<RwLock<SubmitState>>,
    limiter: DailyRateLimiter,
    sender: Arc<dyn MessageSender>,
    acknowledgement: Duration,
    scope: EffectScope,
}

impl ContactForm {
    /// Creates an empty form.
    #[must_use]
    pub fn new(
        limiter: DailyRateLimiter,
        sender: Arc<dyn MessageSender>,
        acknowledgement: Duration,
    ) -> Self {
        Self {
            fields: Mutex::new(ContactMessage::default()),
            state: Arc::new(RwLock::new(SubmitState::Ready)),
            limiter,
            sender,
            acknowledgement,
            scope: EffectScope::new("contact-form"),
        }
    }

    /// Replaces the field contents.
    pub fn fill(&self, message: ContactMessage) {
        *self.fields.lock() = message;
    }

    /// The current field contents.
    #[must_use]
    pub fn fields(&self) -> ContactMessage {
        self.fields.lock().clone()
    }

    /// The submit state.
    #[must_use]
    pub fn state(&self) -> SubmitState {
        *self.state.read()
    }

    /// The limiter guarding this form.
    #[must_use]
    pub const fn limiter(&self) -> &DailyRateLimiter {
        &self.limiter
    }

    /// Submits the current fields.
    ///
    /// Returns today's updated usage on success. Must be called inside a
    /// tokio runtime, since a successful send schedules the return to `Ready`.
    pub async fn submit(&self) -> Result<RateLimitRecord, ContactError> {
        let usage = {
            let mut state = self.state.write();
            if *state == SubmitState::Submitting {
                return Err(ContactError::InFlight);
            }
            let usage = self.limiter.check()?;
            self.scope.reset("new submission");
            *state = SubmitState::Submitting;
            usage
        };

        let message = self.fields();
        let result = self.sender.send(&message).await;

        match result {
            Ok(()) => {
                let usage = match self.limiter.record_success(usage.clone()) {
                    Ok(updated) => updated,
                    Err(err) => {
                        warn!(error = %err, "Could not persist rate-limit record");
                        RateLimitRecord {
                            count: usage.count + 1,
                            ..usage
                        }
                    }
                };
                *self.fields.lock() = ContactMessage::default();
                *self.state.write() = SubmitState::Sent;
                info!(count = usage.count, limit = self.limiter.limit(), "Contact message sent");
                self.schedule_ready();
                Ok(usage)
            }
            Err(err) => {
                *self.state.write() = SubmitState::Ready;
                warn!(error = %err, "Error sending email");
                Err(err.into())
            }
        }
    }

    fn schedule_ready(&self) {
        let state = self.state.clone();
        let window = self.acknowledgement;
        self.scope.spawn("sent-acknowledgement", move |token| async move {
            tokio::select! {
                biased;
                () = token.cancelled() => {}
                () = tokio::time::sleep(window) => {
                    let mut state = state.write();
                    if !token.is_cancelled() && *state == SubmitState::Sent {
                        *state = SubmitState::Ready;
                    }
                }
            }
        });
    }
}

impl std::fmt::Debug for ContactForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactForm")
            .field("state", &self.state())
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}
