//! An interactive terminal session.

use super::commands::{interpret, CommandOutcome, CommandTable, EchoStyle};
use super::history::TerminalHistory;
use crate::core::HistoryEntry;
use tracing::debug;

/// A command table plus the transcript it has produced.
#[derive(Debug, Clone)]
pub struct Terminal {
    table: CommandTable,
    history: TerminalHistory,
}

impl Terminal {
    /// Opens a session, printing the table's banner.
    #[must_use]
    pub fn new(table: CommandTable) -> Self {
        let mut history = TerminalHistory::new();
        for line in table.banner() {
            history.push_output(line.clone());
        }
        Self { table, history }
    }

    /// Opens the landing terminal.
    #[must_use]
    pub fn welcome() -> Self {
        Self::new(CommandTable::welcome())
    }

    /// Opens the floating help terminal.
    #[must_use]
    pub fn floating() -> Self {
        Self::new(CommandTable::floating())
    }

    /// Runs one line of input.
    ///
    /// The input is echoed as `$ <input>` before any output. `clear` empties
    /// the transcript, echo included.
    pub fn submit(&mut self, input: &str) -> CommandOutcome {
        let echoed = match self.table.echo_style() {
            EchoStyle::Trimmed => {
                let trimmed = input.trim();
                if trimmed.is_empty() {
                    return CommandOutcome::Nothing;
                }
                trimmed
            }
            EchoStyle::Raw => input,
        };
        self.history.push_input(format!("$ {echoed}"));

        let outcome = interpret(&self.table, input);
        debug!(terminal = self.table.name(), input = %echoed, outcome = ?outcome_kind(&outcome), "Command submitted");

        match &outcome {
            CommandOutcome::Output(line) => self.history.push_output(line.clone()),
            CommandOutcome::Clear => self.history.clear(),
            CommandOutcome::EnterPipeline | CommandOutcome::Nothing => {}
        }
        outcome
    }

    /// The transcript so far.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    /// The underlying history.
    #[must_use]
    pub const fn history(&self) -> &TerminalHistory {
        &self.history
    }

    /// The command table.
    #[must_use]
    pub const fn table(&self) -> &CommandTable {
        &self.table
    }
}

fn outcome_kind(outcome: &CommandOutcome) -> &'static str {
    match outcome {
        CommandOutcome::Output(_) => "output",
        CommandOutcome::Clear => "clear",
        CommandOutcome::EnterPipeline => "enter_pipeline",
        CommandOutcome::Nothing => "nothing",
    }
}
