//! The contact form and its client-side daily limit.

mod clock;
mod form;
mod limiter;
mod sender;
mod storage;

pub use clock::{day_key, Clock, FixedClock, SystemClock};
pub use form::{ContactForm, SubmitState};
pub use limiter::{DailyRateLimiter, RateLimitRecord};
#[cfg(feature = "emailjs")]
pub use sender::EmailJsSender;
#[cfg(test)]
pub use sender::MockMessageSender;
pub use sender::{ContactMessage, MessageSender, UnconfiguredSender};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
