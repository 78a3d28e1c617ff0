//! Local edit stream.
//!
//! Single ingestion point for user actions: every input is stamped with a
//! strictly increasing sequence number and the ingestion time, then handed
//! to the synchronizer in arrival order. Pure routing, no other side
//! effects.

use chrono::{DateTime, Utc};

use draftsync_orders::{EditInput, TimestampedEdit};

#[derive(Debug)]
pub struct EditStream {
    next_seq: u64,
}

impl EditStream {
    pub fn new() -> Self {
        Self { next_seq: 1 }
    }

    /// Stamp an input with the next sequence number and `now`.
    pub fn record(&mut self, input: EditInput, now: DateTime<Utc>) -> TimestampedEdit {
        let seq = self.next_seq;
        self.next_seq += 1;
        TimestampedEdit {
            seq,
            recorded_at: now,
            input,
        }
    }

    /// Sequence number of the most recently recorded edit (0 if none yet).
    pub fn last_seq(&self) -> u64 {
        self.next_seq - 1
    }
}

impl Default for EditStream {
    fn default() -> Self {
        Self::new()
    }
}
