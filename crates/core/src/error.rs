//! Domain error model.

use thiserror::Error;

/// Result type used across the draft-editing domain.
pub type DraftResult<T> = Result<T, DraftError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures scoped to the editing session
/// (validation, invariants, missing local data). Transport concerns live in
/// the sync crate's `RecalcError`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DraftError {
    /// A value failed validation (e.g. negative quantity).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated (e.g. editing during a blocking sync).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A referenced product or variation is no longer available locally.
    #[error("product not found: {0}")]
    ProductNotFound(String),
}

impl DraftError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn product_not_found(msg: impl Into<String>) -> Self {
        Self::ProductNotFound(msg.into())
    }
}
