use chrono::{DateTime, Utc};

use draftsync_events::Event;
use draftsync_orders::DraftOrder;

use crate::state::SyncState;

/// Notifications published to draft observers.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// The observable draft was replaced (local edit or reconciliation).
    DraftUpdated {
        order: DraftOrder,
        at: DateTime<Utc>,
    },
    /// The sync state machine moved.
    StateChanged {
        state: SyncState,
        at: DateTime<Utc>,
    },
}

impl Event for SyncEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SyncEvent::DraftUpdated { .. } => "order.draft.updated",
            SyncEvent::StateChanged { .. } => "order.sync.state_changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SyncEvent::DraftUpdated { at, .. } => *at,
            SyncEvent::StateChanged { at, .. } => *at,
        }
    }
}
