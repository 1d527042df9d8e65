//! Simulated terminals.
//!
//! Two dialects share one interpreter: the landing terminal, which can `cat`
//! a few files and launch the pipeline, and the floating help terminal.

mod commands;
mod history;
mod session;

pub use commands::{interpret, CommandOutcome, CommandTable, EchoStyle};
pub use history::TerminalHistory;
pub use session::Terminal;
