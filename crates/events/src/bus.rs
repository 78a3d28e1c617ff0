//! Publish/subscribe abstraction for draft observers.
//!
//! The synchronizer publishes draft snapshots and state transitions through
//! this seam; screens subscribe and render. The contract is deliberately
//! small: broadcast fan-out, no persistence, no ordering guarantees between
//! concurrent publishers (the synchronizer is the only publisher in
//! practice, so subscribers see its events in publish order).

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to a published event stream.
///
/// Each subscription receives a copy of every event published after it was
/// created. Designed for single-threaded consumption; a disconnected error
/// means the publishing side was torn down.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next event is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for an event.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain everything currently buffered, without blocking.
    pub fn drain(&self) -> Vec<M> {
        let mut events = Vec::new();
        while let Ok(event) = self.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Typed event source with an explicit subscriber list.
///
/// `publish()` may fail (e.g. internal poisoning); failures are surfaced to
/// the caller, which logs and continues. Observer delivery is best-effort
/// and never blocks the editing session.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
