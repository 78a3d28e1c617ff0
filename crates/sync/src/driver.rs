//! Tokio driver for the synchronizer engine.
//!
//! The engine is synchronous; this task wires it to the wall clock and the
//! recalculation client: commands come in over a channel, the debounce
//! deadline becomes a sleep, and the single in-flight request is a future
//! polled alongside both. Dropping every handle (or sending `Shutdown`)
//! tears the task down.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use draftsync_catalog::CatalogReader;
use draftsync_events::EventBus;
use draftsync_orders::{DraftOrder, EditInput};

use crate::event::SyncEvent;
use crate::remote::{RecalcError, RecalcRequest, RecalculationClient};
use crate::synchronizer::DraftSynchronizer;

/// Commands accepted by the driver task.
#[derive(Debug)]
pub enum SyncCommand {
    Edit(EditInput),
    Commit,
    Retry,
    Shutdown,
}

/// Cheap-to-clone sender half for screens to push commands through.
#[derive(Debug, Clone)]
pub struct SyncHandle {
    tx: mpsc::UnboundedSender<SyncCommand>,
}

impl SyncHandle {
    pub fn edit(&self, input: EditInput) {
        self.send(SyncCommand::Edit(input));
    }

    pub fn commit(&self) {
        self.send(SyncCommand::Commit);
    }

    pub fn retry(&self) {
        self.send(SyncCommand::Retry);
    }

    pub fn shutdown(&self) {
        self.send(SyncCommand::Shutdown);
    }

    fn send(&self, command: SyncCommand) {
        if self.tx.send(command).is_err() {
            tracing::warn!("sync driver is gone; command dropped");
        }
    }
}

type InFlightFuture = Pin<Box<dyn Future<Output = Result<DraftOrder, RecalcError>> + Send>>;

pub struct SyncDriver<C, B, R> {
    engine: DraftSynchronizer<C, B>,
    client: Arc<R>,
    rx: mpsc::UnboundedReceiver<SyncCommand>,
}

impl<C, B, R> SyncDriver<C, B, R>
where
    C: CatalogReader + 'static,
    B: EventBus<SyncEvent> + 'static,
    R: RecalculationClient,
{
    /// Spawn the driver task for an engine.
    pub fn spawn(
        engine: DraftSynchronizer<C, B>,
        client: Arc<R>,
    ) -> (SyncHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let driver = Self { engine, client, rx };
        let task = tokio::spawn(driver.run());
        (SyncHandle { tx }, task)
    }

    async fn run(mut self) {
        tracing::debug!("sync driver started");

        let mut in_flight: Option<InFlightFuture> = None;

        loop {
            // The timer only matters while nothing is in flight; the
            // follow-up is driven by the resolution instead.
            let sleep_for = if in_flight.is_none() {
                self.engine
                    .next_deadline()
                    .map(|deadline| (deadline - Utc::now()).to_std().unwrap_or(Duration::ZERO))
            } else {
                None
            };

            tokio::select! {
                command = self.rx.recv() => {
                    match command {
                        None | Some(SyncCommand::Shutdown) => break,
                        Some(SyncCommand::Edit(input)) => {
                            if let Err(err) = self.engine.submit(input, Utc::now()) {
                                tracing::warn!("edit rejected: {err}");
                            }
                        }
                        Some(SyncCommand::Commit) => {
                            if let Some(request) = self.engine.commit(Utc::now()) {
                                in_flight = Some(self.dispatch(request));
                            }
                        }
                        Some(SyncCommand::Retry) => {
                            if let Some(request) = self.engine.retry(Utc::now()) {
                                in_flight = Some(self.dispatch(request));
                            }
                        }
                    }
                }
                outcome = async { in_flight.as_mut().expect("in-flight future present").await }, if in_flight.is_some() => {
                    in_flight = None;
                    let follow_up = match outcome {
                        Ok(response) => self.engine.resolve(response, Utc::now()),
                        Err(error) => {
                            self.engine.fail(error, Utc::now());
                            None
                        }
                    };
                    if let Some(request) = follow_up {
                        in_flight = Some(self.dispatch(request));
                    }
                }
                _ = tokio::time::sleep(sleep_for.unwrap_or(Duration::ZERO)), if sleep_for.is_some() => {
                    if let Some(request) = self.engine.poll(Utc::now()) {
                        in_flight = Some(self.dispatch(request));
                    }
                }
            }
        }

        tracing::debug!("sync driver stopped");
    }

    fn dispatch(&self, request: RecalcRequest) -> InFlightFuture {
        tracing::debug!(
            request_seq = request.request_seq,
            blocking = request.blocking,
            "dispatching recalculation request"
        );
        let client = Arc::clone(&self.client);
        Box::pin(async move { client.recalculate(&request.candidate).await })
    }
}
