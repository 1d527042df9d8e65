//! Calendar-day source for the rate limiter.

use chrono::{Days, Local, NaiveDate};
use parking_lot::RwLock;

/// Supplies the current local calendar day.
pub trait Clock: Send + Sync {
    /// Today's date.
    fn today(&self) -> NaiveDate;

    /// Today's date formatted like `Sun Jan 25 2026`.
    fn day_key(&self) -> String {
        day_key(self.today())
    }
}

/// Formats a date the way the rate-limit record stores it.
#[must_use]
pub fn day_key(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// The local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A settable clock for tests and demos.
#[derive(Debug)]
pub struct FixedClock {
    date: RwLock<NaiveDate>,
}

impl FixedClock {
    /// Creates a clock stuck on `date`.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self {
            date: RwLock::new(date),
        }
    }

    /// Moves the clock to `date`.
    pub fn set(&self, date: NaiveDate) {
        *self.date.write() = date;
    }

    /// Moves the clock forward by `days`.
    pub fn advance_days(&self, days: u64) {
        let mut date = self.date.write();
        if let Some(next) = date.checked_add_days(Days::new(days)) {
            *date = next;
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.date.read()
    }
}
