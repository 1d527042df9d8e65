//! Stage navigation and the simulated build.

mod controller;
mod progress;

pub use controller::{ControllerSnapshot, StageController};
pub use progress::ProgressSimulator;
