//! Injectable time source.
//!
//! The engine never reads the wall clock on its own; callers pass `now`
//! into every time-sensitive operation, and the driver obtains it from a
//! `Clock`. Tests use `ManualClock` to step time deterministically.

use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Advance the clock by `step` and return the new time.
    pub fn advance(&self, step: Duration) -> DateTime<Utc> {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now = *now + chrono::Duration::from_std(step).expect("step out of range");
        *now
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock poisoned")
    }
}
