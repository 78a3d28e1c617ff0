//! Remote recalculation seam.
//!
//! The remote is the source of truth for computed fields (taxes, totals).
//! This module owns only the contract: given a candidate draft, the client
//! returns the authoritative draft or a typed error. Timeout semantics
//! belong to the client implementation.

use core::future::Future;

use chrono::{DateTime, Utc};
use thiserror::Error;

use draftsync_orders::DraftOrder;

/// Failure of a recalculation request.
///
/// Cloneable so the error can live inside the published sync state while
/// the caller keeps the original.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecalcError {
    #[error("network error: {0}")]
    Network(String),

    /// The remote rejected the candidate (e.g. an invalid address field).
    #[error("validation error: {message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// A recalculation request the engine has decided to issue.
#[derive(Debug, Clone)]
pub struct RecalcRequest {
    pub candidate: DraftOrder,
    pub issued_at: DateTime<Utc>,
    pub request_seq: u64,
    pub blocking: bool,
}

/// Client for the remote order create/update/recalculate endpoint.
///
/// Exactly one call is in flight at a time; the engine enforces that, so
/// implementations need no internal queueing. Implementations must not
/// retry on their own; retry is a user-initiated action.
pub trait RecalculationClient: Send + Sync + 'static {
    fn recalculate(
        &self,
        candidate: &DraftOrder,
    ) -> impl Future<Output = Result<DraftOrder, RecalcError>> + Send;
}
