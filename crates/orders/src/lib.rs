//! `draftsync-orders` — the Draft Order value model, the edit-input
//! vocabulary, and the transformer that folds edits into a draft.
//!
//! A draft is immutable in representation: every change produces a new
//! snapshot via the `with_*` copy constructors, never an in-place mutation.

pub mod draft;
pub mod edit;
pub mod transformer;

pub use draft::{
    Address, CouponLine, DraftOrder, FeeLine, LineItem, OrderStatus, OrderTotals, ShippingLine,
};
pub use edit::{EditInput, ProductRef, TimestampedEdit};
pub use transformer::{apply_edit, apply_edits};
