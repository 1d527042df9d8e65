//! Paced reveal: typing and line-by-line transcript effects.
//!
//! Both effects are the same primitive, a [`PacedSequence`] of items each
//! revealed after its own delay, driven by [`drive`] inside an
//! [`EffectScope`](crate::cancellation::EffectScope) so restarts and teardown
//! cancel every pending tick.

mod lines;
mod paced;
mod typing;

pub use lines::LineRevealSequencer;
pub use paced::{drive, PacedItem, PacedSequence, RevealOutcome};
pub use typing::{typing_frames, TypingSequencer};
