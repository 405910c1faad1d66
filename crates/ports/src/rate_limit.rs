// crates/ports/src/rate_limit.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Remaining request budget reported by the host, and when it refills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quota {
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}

impl Quota {
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// A provider response together with the quota signal that came with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metered<T> {
    pub value: T,
    pub quota: Option<Quota>,
}

impl<T> Metered<T> {
    pub fn new(value: T, quota: Option<Quota>) -> Self {
        Self { value, quota }
    }

    /// Response from a transport that does not report quota.
    pub fn unmetered(value: T) -> Self {
        Self { value, quota: None }
    }
}
