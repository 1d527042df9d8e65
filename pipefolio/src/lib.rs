//! # Pipefolio
//!
//! A portfolio walkthrough staged as a simulated DevOps pipeline
//! (Plan → Code → Build → Test → Release → Deploy → Operate → Monitor).
//!
//! Nothing here automates a real build. The crate provides the choreography
//! that makes it look like one:
//!
//! - **Stage control**: a linear eight-stage state machine whose navigation is
//!   gated on the active stage's entry animation
//! - **Paced reveal**: one cancellable scheduler for per-character typing and
//!   per-line transcript reveals
//! - **Build simulation**: a fixed-tick progress counter
//! - **Simulated terminals**: canned command tables with exact matching
//! - **Contact gate**: a client-local daily rate limit in front of an outbound
//!   email send
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pipefolio::prelude::*;
//!
//! let controller = StageController::new(TimingConfig::default());
//! controller.go_to(Stage::Build);
//! // ... 5 seconds later
//! assert!(controller.can_navigate());
//! controller.next();
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod app;
pub mod cancellation;
pub mod config;
pub mod contact;
pub mod content;
pub mod core;
pub mod errors;
pub mod events;
pub mod observability;
pub mod pipeline;
pub mod render;
pub mod reveal;
pub mod session;
pub mod terminal;
pub mod views;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::app::{App, AppDeps, Phase};
    pub use crate::cancellation::{CancellationToken, EffectScope};
    pub use crate::config::{ContactConfig, SiteConfig, TimingConfig, UnlockPolicy};
    pub use crate::contact::{
        Clock, ContactForm, ContactMessage, DailyRateLimiter, JsonFileStore, KeyValueStore,
        MemoryStore, MessageSender, RateLimitRecord, SubmitState, SystemClock, UnconfiguredSender,
    };
    pub use crate::core::{DisplayLine, EntryKind, HistoryEntry, Stage, Tone};
    pub use crate::errors::{ContactError, PipefolioError, SendError, StorageError};
    pub use crate::events::{EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::pipeline::{ControllerSnapshot, ProgressSimulator, StageController};
    pub use crate::render::TextRenderer;
    pub use crate::reveal::{
        LineRevealSequencer, PacedItem, PacedSequence, RevealOutcome, TypingSequencer,
    };
    pub use crate::session::WelcomeGate;
    pub use crate::terminal::{CommandOutcome, CommandTable, Terminal, TerminalHistory};
    pub use crate::views::{StageView, ViewEvent};
}
