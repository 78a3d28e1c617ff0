//! Sync lifecycle states.

use crate::remote::RecalcError;

/// Where the synchronizer stands with respect to the remote.
///
/// `idle` → `syncing` on dispatch; back to `idle` on success (or straight
/// into the follow-up `syncing` when edits queued up mid-flight); `error`
/// on failure. Errors are never retried automatically; `retry` is a
/// user-initiated transition. A new edit input while in `error` returns to
/// `idle` and re-arms the debounce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    /// A recalculation request is in flight. `blocking` syncs (commit, or
    /// the initial remote create) reject further edits until resolved.
    Syncing { blocking: bool },
    Error(RecalcError),
}

impl SyncState {
    pub fn is_idle(&self) -> bool {
        matches!(self, SyncState::Idle)
    }

    pub fn is_syncing(&self) -> bool {
        matches!(self, SyncState::Syncing { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SyncState::Error(_))
    }

    /// True while edits must be rejected rather than queued.
    pub fn blocks_edits(&self) -> bool {
        matches!(self, SyncState::Syncing { blocking: true })
    }
}
