use chrono::{DateTime, Utc};

/// A notification published to draft observers.
///
/// Events are immutable facts about the editing session; subscribers must
/// treat them as read-only and tolerate receiving the same event more than
/// once.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "order.draft.updated").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
