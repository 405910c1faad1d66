//! What a traversal left out, and why.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound on remembered example paths; counts are always exact.
const MAX_SAMPLES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// Reported size above the configured maximum; never fetched.
    Oversized,
    /// Content fetch returned nothing or failed for this file only.
    Unreadable,
    /// Fetched content was empty; nothing to count.
    Empty,
    /// A directory vanished between listing its parent and listing it.
    DirectoryMissing,
    /// A directory listing failed; its subtree was not traversed.
    DirectoryUnavailable,
    /// A whole repository could not be traversed.
    RepositoryFailed,
    /// Work never scheduled because the request was interrupted.
    NotStarted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedItem {
    pub reason: SkipReason,
    pub path: String,
}

/// Skip counts per reason plus a bounded sample of affected paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipDiagnostics {
    counts: BTreeMap<SkipReason, u64>,
    samples: Vec<SkippedItem>,
}

impl SkipDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, reason: SkipReason, path: impl Into<String>) {
        *self.counts.entry(reason).or_insert(0) += 1;
        if self.samples.len() < MAX_SAMPLES {
            self.samples.push(SkippedItem { reason, path: path.into() });
        }
    }

    pub fn merge(&mut self, other: SkipDiagnostics) {
        for (reason, count) in other.counts {
            *self.counts.entry(reason).or_insert(0) += count;
        }
        let room = MAX_SAMPLES.saturating_sub(self.samples.len());
        self.samples.extend(other.samples.into_iter().take(room));
    }

    pub fn count(&self, reason: SkipReason) -> u64 {
        self.counts.get(&reason).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn samples(&self) -> &[SkippedItem] {
        &self.samples
    }
}

/// Why a traversal stopped before covering everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "cause")]
pub enum Interruption {
    QuotaExceeded { reset_at: DateTime<Utc> },
    DeadlineExceeded,
}

impl Interruption {
    /// When two interruptions meet, quota wins: it carries a retry hint.
    pub fn combine(self, other: Interruption) -> Interruption {
        match (self, other) {
            (Self::QuotaExceeded { .. }, _) => self,
            (_, Self::QuotaExceeded { .. }) => other,
            _ => self,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum Completeness {
    Complete,
    Partial { interruption: Interruption },
}

impl Completeness {
    pub fn from_interruption(interruption: Option<Interruption>) -> Self {
        match interruption {
            Some(interruption) => Self::Partial { interruption },
            None => Self::Complete,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}
