use repo_lines_domain::Interruption;
use repo_lines_ports::{Clock, Metered};
use repo_lines_shared_kernel::{ProviderError, ProviderResult};

use crate::{deadline::Deadline, quota_gate::QuotaGate};

/// Why a guarded remote call produced no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    /// The call was refused or answered with an exhausted quota, or the
    /// deadline passed. Nothing further should be scheduled.
    Interrupted(Interruption),
    Provider(ProviderError),
}

/// Per-request guard every remote call goes through.
#[derive(Clone, Copy)]
pub struct RequestScope<'a> {
    gate: &'a QuotaGate,
    clock: &'a dyn Clock,
    deadline: Deadline,
}

impl<'a> RequestScope<'a> {
    pub fn new(gate: &'a QuotaGate, clock: &'a dyn Clock, deadline: Deadline) -> Self {
        Self { gate, clock, deadline }
    }

    pub fn clock(&self) -> &'a dyn Clock {
        self.clock
    }

    /// `Err` when a call made now would be refused.
    pub fn admit(&self) -> Result<(), Interruption> {
        let now = self.clock.now();
        if self.deadline.is_expired(now) {
            return Err(Interruption::DeadlineExceeded);
        }
        self.gate.check(now).map_err(|reset_at| Interruption::QuotaExceeded { reset_at })
    }

    /// Admit, run `call`, and feed its quota signal back to the gate.
    pub fn call<T>(&self, call: impl FnOnce() -> ProviderResult<Metered<T>>) -> Result<T, CallError> {
        self.admit().map_err(CallError::Interrupted)?;
        match call() {
            Ok(metered) => {
                if let Some(quota) = metered.quota {
                    self.gate.observe(quota);
                }
                Ok(metered.value)
            }
            Err(ProviderError::QuotaExceeded { reset_at }) => {
                self.gate.trip(reset_at);
                Err(CallError::Interrupted(Interruption::QuotaExceeded { reset_at }))
            }
            Err(err) => Err(CallError::Provider(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::TimeDelta;
    use repo_lines_ports::Quota;

    use super::*;
    use crate::testing::FixedClock;

    #[test]
    fn exhausted_quota_blocks_the_next_call() {
        let gate = QuotaGate::new();
        let clock = FixedClock::default();
        let scope = RequestScope::new(&gate, &clock, Deadline::none());
        let reset_at = clock.instant() + TimeDelta::minutes(10);

        let value = scope.call(|| Ok(Metered::new(7, Some(Quota { remaining: 0, reset_at }))));
        assert_eq!(value, Ok(7));

        let mut called = false;
        let refused = scope.call(|| {
            called = true;
            Ok(Metered::unmetered(()))
        });
        assert_eq!(refused, Err(CallError::Interrupted(Interruption::QuotaExceeded { reset_at })));
        assert!(!called);
    }

    #[test]
    fn provider_quota_error_trips_the_gate() {
        let gate = QuotaGate::new();
        let clock = FixedClock::default();
        let scope = RequestScope::new(&gate, &clock, Deadline::none());
        let reset_at = clock.instant() + TimeDelta::minutes(1);

        let result: Result<(), _> = scope.call(|| Err(ProviderError::QuotaExceeded { reset_at }));
        assert_eq!(result, Err(CallError::Interrupted(Interruption::QuotaExceeded { reset_at })));
        assert_eq!(gate.suspended_until(), Some(reset_at));
    }

    #[test]
    fn other_provider_errors_pass_through() {
        let gate = QuotaGate::new();
        let clock = FixedClock::default();
        let scope = RequestScope::new(&gate, &clock, Deadline::none());

        let result: Result<(), _> = scope.call(|| Err(ProviderError::not_found("x")));
        assert_eq!(result, Err(CallError::Provider(ProviderError::not_found("x"))));
        assert!(scope.admit().is_ok());
    }

    #[test]
    fn expired_deadline_refuses_calls() {
        let gate = QuotaGate::new();
        let clock = FixedClock::default();
        let scope = RequestScope::new(&gate, &clock, Deadline::after(clock.instant(), Duration::ZERO));
        assert_eq!(scope.admit(), Err(Interruption::DeadlineExceeded));
    }
}
