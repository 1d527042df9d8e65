//! Core domain model types for pipefolio.
//!
//! This module contains the fundamental types used throughout the crate:
//! - The fixed eight-stage pipeline order
//! - Display lines and their tones
//! - Terminal history entries

mod line;
mod stage;

pub use line::{DisplayLine, EntryKind, HistoryEntry, Tone};
pub use stage::{ParseStageError, Stage};
