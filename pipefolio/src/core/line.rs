//! Display lines and terminal history entries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Visual emphasis of a line. Renderers decide how to show it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Regular body text.
    #[default]
    Default,
    /// An echoed shell command.
    Command,
    /// De-emphasised text.
    Muted,
    /// Positive result.
    Success,
    /// Neutral information.
    Info,
    /// Attention.
    Warning,
    /// Failure or unknown command.
    Error,
    /// Highlighted content.
    Accent,
}

/// A single line of revealable content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayLine {
    /// The text, which may span several physical lines.
    pub text: String,
    /// How the line should be emphasised.
    #[serde(default)]
    pub tone: Tone,
}

impl DisplayLine {
    /// Creates a line with the given tone.
    #[must_use]
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    /// Creates a default-toned line.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Default)
    }

    /// Creates an empty spacer line.
    #[must_use]
    pub fn blank() -> Self {
        Self::plain(" ")
    }
}

impl fmt::Display for DisplayLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Whether a history entry was typed by the visitor or printed by the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Echoed visitor input.
    Input,
    /// Terminal output.
    Output,
}

/// One entry of a terminal transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Input or output.
    pub kind: EntryKind,
    /// The line content.
    pub line: DisplayLine,
}

impl HistoryEntry {
    /// Creates an input entry.
    #[must_use]
    pub fn input(content: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Input,
            line: DisplayLine::new(content, Tone::Command),
        }
    }

    /// Creates an output entry.
    #[must_use]
    pub fn output(line: DisplayLine) -> Self {
        Self {
            kind: EntryKind::Output,
            line,
        }
    }

    /// The raw text of the entry.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.line.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_entry_kinds() {
        let input = HistoryEntry::input("$ help");
        assert_eq!(input.kind, EntryKind::Input);
        assert_eq!(input.line.tone, Tone::Command);
        assert_eq!(input.content(), "$ help");

        let output = HistoryEntry::output(DisplayLine::new("ok", Tone::Success));
        assert_eq!(output.kind, EntryKind::Output);
    }

    #[test]
    fn test_line_deserialize_default_tone() {
        let line: DisplayLine = serde_json::from_str(r#"{"text": "hi"}"#).unwrap();
        assert_eq!(line.tone, Tone::Default);
    }
}
