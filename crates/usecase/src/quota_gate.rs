use std::sync::RwLock;

use chrono::{DateTime, Utc};
use repo_lines_ports::Quota;

#[derive(Debug, Default)]
struct GateState {
    last_seen: Option<Quota>,
    suspended_until: Option<DateTime<Utc>>,
}

/// Process-wide view of the host's rate limit.
///
/// Once the host reports an exhausted budget every further remote call is
/// refused until the reset time passes.
#[derive(Debug, Default)]
pub struct QuotaGate {
    state: RwLock<GateState>,
}

impl QuotaGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the quota attached to a successful response.
    pub fn observe(&self, quota: Quota) {
        let mut state = self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.last_seen = Some(quota);
        if quota.is_exhausted() {
            suspend(&mut state, quota.reset_at);
        }
    }

    /// Record an explicit "quota exceeded" answer from the host.
    pub fn trip(&self, reset_at: DateTime<Utc>) {
        let mut state = self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        suspend(&mut state, reset_at);
    }

    /// `Err(reset_at)` while calls are suspended.
    pub fn check(&self, now: DateTime<Utc>) -> Result<(), DateTime<Utc>> {
        {
            let state = self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner());
            match state.suspended_until {
                None => return Ok(()),
                Some(until) if now < until => return Err(until),
                Some(_) => {}
            }
        }
        let mut state = self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        if state.suspended_until.is_some_and(|until| now >= until) {
            state.suspended_until = None;
        }
        Ok(())
    }

    pub fn last_seen(&self) -> Option<Quota> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner()).last_seen
    }

    pub fn suspended_until(&self) -> Option<DateTime<Utc>> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner()).suspended_until
    }
}

fn suspend(state: &mut GateState, reset_at: DateTime<Utc>) {
    state.suspended_until = Some(match state.suspended_until {
        Some(current) if current > reset_at => current,
        _ => reset_at,
    });
}
