//! Escalation age: elapsed whole days since creation
//!
//! Unset, zero-sentinel and future timestamps all derive to
//! [`Age::NotCreated`] instead of an error or a negative count, so one bad
//! record never breaks a pass over the whole collection.

use chrono::{DateTime, Utc};
use std::fmt;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Frozen clock for reproducible derived views
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Derived age of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Age {
    /// No valid creation instant (unset, zero sentinel, or in the future)
    NotCreated,
    /// Whole days elapsed since creation
    Days(u64),
}

impl Age {
    pub fn days(&self) -> Option<u64> {
        match self {
            Age::Days(days) => Some(*days),
            Age::NotCreated => None,
        }
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Age::NotCreated => write!(f, "Not yet created"),
            Age::Days(1) => write!(f, "1 day"),
            Age::Days(days) => write!(f, "{} days", days),
        }
    }
}

/// Whole days between `created_at` and `now`
pub fn days_since(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Age {
    let Some(created_at) = created_at else {
        return Age::NotCreated;
    };

    if created_at.timestamp_millis() == 0 || created_at > now {
        return Age::NotCreated;
    }

    let elapsed = (now - created_at).num_milliseconds();
    Age::Days((elapsed / MILLIS_PER_DAY).max(0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_three_days_two_hours() {
        let created = now() - Duration::days(3) - Duration::hours(2);
        let age = days_since(Some(created), now());
        assert_eq!(age, Age::Days(3));
        assert_eq!(age.to_string(), "3 days");
    }

    #[test]
    fn test_unset_is_not_created() {
        let age = days_since(None, now());
        assert_eq!(age, Age::NotCreated);
        assert_eq!(age.to_string(), "Not yet created");
    }

    #[test]
    fn test_zero_sentinel_is_not_created() {
        let epoch = DateTime::<Utc>::from_timestamp(0, 0).unwrap();
        assert_eq!(days_since(Some(epoch), now()), Age::NotCreated);
    }

    #[test]
    fn test_future_is_not_created() {
        let created = now() + Duration::minutes(5);
        assert_eq!(days_since(Some(created), now()), Age::NotCreated);
    }

    #[test]
    fn test_display_singular_and_plural() {
        assert_eq!(Age::Days(0).to_string(), "0 days");
        assert_eq!(Age::Days(1).to_string(), "1 day");
        assert_eq!(Age::Days(2).to_string(), "2 days");
    }

    #[test]
    fn test_same_instant_is_zero_days() {
        assert_eq!(days_since(Some(now()), now()), Age::Days(0));
        let almost = now() - Duration::hours(23) - Duration::minutes(59);
        assert_eq!(days_since(Some(almost), now()), Age::Days(0));
    }

    #[test]
    fn test_frozen_clock_is_reproducible() {
        let clock = FixedClock(now());
        let created = Some(now() - Duration::days(10));
        assert_eq!(days_since(created, clock.now()), days_since(created, clock.now()));
    }
}
