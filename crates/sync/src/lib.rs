//! `draftsync-sync` — the order draft synchronizer.
//!
//! Local edits are captured in arrival order, coalesced over a debounce
//! window, sent to a remote recalculation endpoint, and reconciled back
//! into a canonical draft. The engine in [`synchronizer`] is synchronous
//! and clock-injected; [`driver`] pumps it on tokio, and [`http`] provides
//! the reqwest-backed recalculation client.

pub mod clock;
pub mod debounce;
pub mod driver;
pub mod event;
pub mod http;
pub mod remote;
pub mod state;
pub mod stream;
pub mod synchronizer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use debounce::DebounceTimer;
pub use driver::{SyncCommand, SyncDriver, SyncHandle};
pub use event::SyncEvent;
pub use http::HttpRecalculationClient;
pub use remote::{RecalcError, RecalcRequest, RecalculationClient};
pub use state::SyncState;
pub use stream::EditStream;
pub use synchronizer::{DraftSynchronizer, SyncConfig};
