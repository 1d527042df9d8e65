//! Client-side daily submission limit.

use super::{Clock, KeyValueStore};
use crate::errors::{ContactError, StorageError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Persisted usage for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitRecord {
    /// Successful sends on `date`.
    pub count: u32,
    /// The day the count belongs to, formatted like `Sun Jan 25 2026`.
    pub date: String,
}

impl RateLimitRecord {
    /// A zero count for `date`.
    #[must_use]
    pub fn fresh(date: impl Into<String>) -> Self {
        Self {
            count: 0,
            date: date.into(),
        }
    }
}

/// Allows a fixed number of successful sends per local calendar day.
///
/// The count resets implicitly: a stored record for any other day reads as
/// zero for today. The limit is advisory and lives only in the local store.
#[derive(Clone)]
pub struct DailyRateLimiter {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    key: String,
    limit: u32,
}

impl DailyRateLimiter {
    /// Creates a limiter over `store`, keyed by `key`.
    #[must_use]
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        key: impl Into<String>,
        limit: u32,
    ) -> Self {
        Self {
            store,
            clock,
            key: key.into(),
            limit,
        }
    }

    /// The daily ceiling.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Today's usage.
    ///
    /// A missing record, a record for another day, and an unreadable record
    /// all count as zero. Unreadable records are logged, never surfaced.
    #[must_use]
    pub fn usage_today(&self) -> RateLimitRecord {
        let today = self.clock.day_key();
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return RateLimitRecord::fresh(today),
            Err(err) => {
                warn!(key = %self.key, error = %err, "Could not read rate-limit record");
                return RateLimitRecord::fresh(today);
            }
        };

        match serde_json::from_str::<RateLimitRecord>(&raw) {
            Ok(record) if record.date == today => record,
            Ok(record) => {
                debug!(stored_date = %record.date, "Rate-limit record is from another day");
                RateLimitRecord::fresh(today)
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "Error parsing limit usage");
                RateLimitRecord::fresh(today)
            }
        }
    }

    /// Sends left today.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.usage_today().count)
    }

    /// Returns today's usage if another send is allowed.
    pub fn check(&self) -> Result<RateLimitRecord, ContactError> {
        let usage = self.usage_today();
        if usage.count >= self.limit {
            debug!(count = usage.count, limit = self.limit, "Daily limit reached");
            return Err(ContactError::LimitReached { limit: self.limit });
        }
        Ok(usage)
    }

    /// Counts one successful send against `usage` and persists it.
    pub fn record_success(&self, mut usage: RateLimitRecord) -> Result<RateLimitRecord, StorageError> {
        usage.count += 1;
        let raw = serde_json::to_string(&usage)?;
        self.store.set(&self.key, &raw)?;
        debug!(count = usage.count, date = %usage.date, "Recorded successful send");
        Ok(usage)
    }
}

impl std::fmt::Debug for DailyRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DailyRateLimiter")
            .field("key", &self.key)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::{FixedClock, MemoryStore};
    use chrono::NaiveDate;

    const KEY: &str = "portfolio_contact_limit";

    fn limiter() -> (DailyRateLimiter, Arc<MemoryStore>, Arc<FixedClock>) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2026, 1, 25).unwrap()));
        let limiter = DailyRateLimiter::new(store.clone(), clock.clone(), KEY, 5);
        (limiter, store, clock)
    }

    #[test]
    fn test_missing_record_is_zero() {
        let (limiter, _, _) = limiter();
        assert_eq!(limiter.usage_today(), RateLimitRecord::fresh("Sun Jan 25 2026"));
        assert_eq!(limiter.remaining(), 5);
    }

    #[test]
    fn test_blocks_at_limit() {
        let (limiter, store, _) = limiter();
        for _ in 0..5 {
            let usage = limiter.check().unwrap();
            limiter.record_success(usage).unwrap();
        }
        assert_eq!(
            limiter.check(),
            Err(ContactError::LimitReached { limit: 5 })
        );
        assert_eq!(
            store.get(KEY).unwrap().as_deref(),
            Some(r#"{"count":5,"date":"Sun Jan 25 2026"}"#)
        );
    }

    #[test]
    fn test_new_day_resets() {
        let (limiter, store, clock) = limiter();
        store
            .set(KEY, r#"{"count":5,"date":"Sun Jan 25 2026"}"#)
            .unwrap();
        assert!(limiter.check().is_err());

        clock.advance_days(1);
        let usage = limiter.check().unwrap();
        assert_eq!(usage.count, 0);
        let usage = limiter.record_success(usage).unwrap();
        assert_eq!(usage, RateLimitRecord { count: 1, date: "Mon Jan 26 2026".to_string() });
    }

    #[test]
    fn test_malformed_record_is_zero() {
        let (limiter, store, _) = limiter();
        store.set(KEY, "{not json").unwrap();
        assert_eq!(limiter.usage_today().count, 0);
        assert!(limiter.check().is_ok());
    }
}
