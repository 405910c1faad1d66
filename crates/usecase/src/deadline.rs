use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// Optional point in time after which a request issues no more remote calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    budget: Option<Duration>,
    expires_at: Option<DateTime<Utc>>,
}

impl Deadline {
    pub fn none() -> Self {
        Self { budget: None, expires_at: None }
    }

    /// `budget` from `now`. Budgets too large to represent never expire.
    pub fn after(now: DateTime<Utc>, budget: Duration) -> Self {
        let expires_at = TimeDelta::from_std(budget).ok().and_then(|delta| now.checked_add_signed(delta));
        Self { budget: Some(budget), expires_at }
    }

    pub fn from_option(now: DateTime<Utc>, budget: Option<Duration>) -> Self {
        budget.map_or_else(Self::none, |budget| Self::after(now, budget))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    pub fn budget(&self) -> Option<Duration> {
        self.budget
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn expires_once_budget_is_spent() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let deadline = Deadline::after(start, Duration::from_secs(5));
        assert!(!deadline.is_expired(start));
        assert!(!deadline.is_expired(start + TimeDelta::seconds(4)));
        assert!(deadline.is_expired(start + TimeDelta::seconds(5)));
        assert_eq!(deadline.budget(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn none_never_expires() {
        let far = Utc.with_ymd_and_hms(2999, 1, 1, 0, 0, 0).unwrap();
        assert!(!Deadline::none().is_expired(far));
    }
}
