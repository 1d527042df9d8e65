//! Walkthrough events.
//!
//! The stage controller reports what happens through an [`EventSink`]. Names
//! are dotted strings and payloads are JSON so any sink can log or record them.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

use crate::core::Stage;
use parking_lot::RwLock;
use serde_json::{json, Value};
use std::sync::Arc;

/// A stage became active.
pub const STAGE_ENTERED: &str = "stage.entered";
/// Navigation unlocked for the active stage.
pub const STAGE_UNLOCKED: &str = "stage.unlocked";
/// A build progress tick.
pub const BUILD_PROGRESS: &str = "build.progress";
/// The build reached its target.
pub const BUILD_COMPLETED: &str = "build.completed";
/// A navigation request was refused.
pub const NAVIGATION_BLOCKED: &str = "navigation.blocked";

/// Payload naming a stage.
#[must_use]
pub fn stage_data(stage: Stage) -> Option<Value> {
    Some(json!({ "stage": stage.to_string() }))
}

/// Payload for a refused navigation request.
#[must_use]
pub fn blocked_data(from: Stage, requested: Option<Stage>, reason: &str) -> Option<Value> {
    Some(json!({
        "from": from.to_string(),
        "requested": requested.map(|s| s.to_string()),
        "reason": reason,
    }))
}

/// Payload for a build tick.
#[must_use]
pub fn progress_data(progress: u8) -> Option<Value> {
    Some(json!({ "progress": progress }))
}

static GLOBAL_EVENT_SINK: RwLock<Option<Arc<dyn EventSink>>> = RwLock::new(None);

/// Sets the process-wide event sink.
pub fn set_event_sink(sink: Arc<dyn EventSink>) {
    *GLOBAL_EVENT_SINK.write() = Some(sink);
}

/// Clears the process-wide event sink.
pub fn clear_event_sink() {
    *GLOBAL_EVENT_SINK.write() = None;
}

/// Gets the process-wide event sink, or a [`NoOpEventSink`] if none is set.
pub fn get_event_sink() -> Arc<dyn EventSink> {
    GLOBAL_EVENT_SINK
        .read()
        .clone()
        .unwrap_or_else(|| Arc::new(NoOpEventSink))
}
