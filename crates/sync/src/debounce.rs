//! Explicit debounce deadline.
//!
//! Arm on input, arm again to push the deadline out (cancel-and-rearm),
//! fire when the quiescence window elapses with no new input. Keeping this
//! as a plain deadline value makes the timing behavior testable with a
//! manual clock instead of a reactive operator.

use std::time::Duration;

use chrono::{DateTime, Utc};

#[derive(Debug)]
pub struct DebounceTimer {
    window: chrono::Duration,
    deadline: Option<DateTime<Utc>>,
}

impl DebounceTimer {
    pub fn new(window: Duration) -> Self {
        Self {
            window: chrono::Duration::from_std(window).unwrap_or(chrono::Duration::MAX),
            deadline: None,
        }
    }

    /// Start (or restart) the quiescence window at `now`.
    pub fn arm(&mut self, now: DateTime<Utc>) {
        self.deadline = Some(now + self.window);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Consume the deadline if it has passed.
    pub fn fire_due(&mut self, now: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
