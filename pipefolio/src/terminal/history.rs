//! Terminal transcript storage.

use crate::core::{DisplayLine, HistoryEntry};

/// The ordered entries of one terminal session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalHistory {
    entries: Vec<HistoryEntry>,
}

impl TerminalHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Appends an echoed command.
    pub fn push_input(&mut self, content: impl Into<String>) {
        self.push(HistoryEntry::input(content));
    }

    /// Appends terminal output.
    pub fn push_output(&mut self, line: DisplayLine) {
        self.push(HistoryEntry::output(line));
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The most recent entry.
    #[must_use]
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntryKind;

    #[test]
    fn test_push_and_clear() {
        let mut history = TerminalHistory::new();
        history.push_input("$ ls");
        history.push_output(DisplayLine::plain("about.txt"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].kind, EntryKind::Input);
        assert_eq!(history.last().map(HistoryEntry::content), Some("about.txt"));

        history.clear();
        assert!(history.is_empty());
    }
}
