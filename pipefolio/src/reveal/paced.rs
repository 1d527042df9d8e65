//! The paced-reveal state machine and its scheduler loop.
//!
//! Typing one character at a time, revealing one transcript line at a time,
//! and counting build progress one percent at a time are all the same thing:
//! an ordered list of items, each exposed after its own delay. The sequence
//! itself is a plain state machine (`index` over `items`) so it can be
//! inspected and stepped without timers; [`drive`] is the only place that
//! waits.

use crate::cancellation::CancellationToken;
use std::time::Duration;

/// An item together with the delay that precedes its reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacedItem<T> {
    /// The revealed item.
    pub item: T,
    /// Delay measured from the previous reveal (or from the start).
    pub delay: Duration,
}

impl<T> PacedItem<T> {
    /// Creates a paced item.
    #[must_use]
    pub const fn new(item: T, delay: Duration) -> Self {
        Self { item, delay }
    }

    /// Creates a paced item with a delay in milliseconds.
    #[must_use]
    pub const fn after_ms(item: T, millis: u64) -> Self {
        Self::new(item, Duration::from_millis(millis))
    }
}

/// An ordered, restartable sequence of paced items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacedSequence<T> {
    items: Vec<PacedItem<T>>,
    start_index: usize,
    index: usize,
}

impl<T> PacedSequence<T> {
    /// Creates a sequence positioned at the first item.
    #[must_use]
    pub fn new(items: Vec<PacedItem<T>>) -> Self {
        Self {
            items,
            start_index: 0,
            index: 0,
        }
    }

    /// Creates a sequence where every item waits the same delay.
    #[must_use]
    pub fn uniform(items: impl IntoIterator<Item = T>, delay: Duration) -> Self {
        Self::new(
            items
                .into_iter()
                .map(|item| PacedItem::new(item, delay))
                .collect(),
        )
    }

    /// Sets the position that [`PacedSequence::restart`] returns to, and moves there.
    ///
    /// Indices past the end are clamped to the end.
    #[must_use]
    pub fn with_start_index(mut self, start_index: usize) -> Self {
        self.start_index = start_index.min(self.items.len());
        self.index = self.start_index;
        self
    }

    /// Total number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no items at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the next item to reveal.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.index
    }

    /// The index restarts return to.
    #[must_use]
    pub const fn start_index(&self) -> usize {
        self.start_index
    }

    /// Returns true once every item has been revealed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.index >= self.items.len()
    }

    /// The delay before the next reveal, or `None` when finished.
    #[must_use]
    pub fn next_delay(&self) -> Option<Duration> {
        self.items.get(self.index).map(|paced| paced.delay)
    }

    /// Reveals the next item and moves past it.
    pub fn advance(&mut self) -> Option<(usize, &T)> {
        let index = self.index;
        let paced = self.items.get(index)?;
        self.index += 1;
        Some((index, &paced.item))
    }

    /// Moves back to the start index.
    pub fn restart(&mut self) {
        self.index = self.start_index;
    }

    /// All items, revealed or not.
    #[must_use]
    pub fn items(&self) -> &[PacedItem<T>] {
        &self.items
    }

    /// Sum of the delays still ahead.
    #[must_use]
    pub fn remaining_duration(&self) -> Duration {
        self.items[self.index.min(self.items.len())..]
            .iter()
            .map(|paced| paced.delay)
            .sum()
    }
}

/// How a driven sequence ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Every item was revealed.
    Completed,
    /// The token was cancelled first.
    Cancelled,
}

/// Drives a sequence to the end, calling `on_reveal` for each item.
///
/// Each item is revealed only after its delay has elapsed since the previous
/// reveal. Cancellation is observed both while waiting and immediately before
/// every reveal, so no reveal happens after the token is cancelled.
pub async fn drive<T, F>(
    sequence: &mut PacedSequence<T>,
    token: &CancellationToken,
    mut on_reveal: F,
) -> RevealOutcome
where
    F: FnMut(usize, &T),
{
    if token.is_cancelled() {
        return RevealOutcome::Cancelled;
    }

    while let Some(delay) = sequence.next_delay() {
        tokio::select! {
            biased;
            () = token.cancelled() => return RevealOutcome::Cancelled,
            () = tokio::time::sleep(delay) => {}
        }

        if token.is_cancelled() {
            return RevealOutcome::Cancelled;
        }

        if let Some((index, item)) = sequence.advance() {
            on_reveal(index, item);
        }
    }

    RevealOutcome::Completed
}
