//! `draftsync-events` — explicit observer machinery.
//!
//! Reactive property publishing from the original client is reimplemented
//! here as a plain pub/sub seam: a typed event source with an explicit
//! subscriber list, torn down when the owner is dropped.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
