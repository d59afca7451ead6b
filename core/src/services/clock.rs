//! Rounded-to-the-second time source.
//!
//! Every issued-at, expires-at and revoked-at instant comes from a [`Clock`],
//! so comparisons never depend on sub-second noise and tests can pin time.

use std::sync::Mutex;

use chrono::{DateTime, Duration, SubsecRound, Utc};

pub trait Clock: Send + Sync {
    /// Current instant truncated to whole seconds
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(0)
    }
}

/// Manually driven clock for deterministic tests
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start.trunc_subsecs(0)),
        }
    }

    /// Starts at the current wall-clock second
    pub fn starting_now() -> Self {
        Self::new(Utc::now())
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now = instant.trunc_subsecs(0);
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now = (*now + by).trunc_subsecs(0);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_system_clock_has_no_subseconds() {
        assert_eq!(SystemClock.now().nanosecond(), 0);
    }

    #[test]
    fn test_manual_clock_rounds_and_advances() {
        let start = Utc.timestamp_opt(1_700_000_000, 750_000_000).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), Utc.timestamp_opt(1_700_000_000, 0).unwrap());

        clock.advance(Duration::seconds(30));
        assert_eq!(clock.now(), Utc.timestamp_opt(1_700_000_030, 0).unwrap());

        clock.set(Utc.timestamp_opt(42, 999_999_999).unwrap());
        assert_eq!(clock.now(), Utc.timestamp_opt(42, 0).unwrap());
    }
}
