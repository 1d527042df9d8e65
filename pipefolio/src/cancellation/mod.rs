//! Structured cancellation for timer-driven effects.
//!
//! This module provides:
//! - CancellationToken for cooperative cancellation
//! - EffectScope for owning and tearing down the tasks of one view

mod scope;
mod token;

pub use scope::EffectScope;
pub use token::{CancelCallback, CancellationToken};
