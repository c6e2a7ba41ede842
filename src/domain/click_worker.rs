//! Asynchronous click counting.
//!
//! Redirect handlers push identifiers into a conduit through a
//! [`ClickSender`]; exactly one background task drains it and calls
//! [`UrlRepository::register_click`] for each entry in FIFO order. Because
//! there is a single consumer, counter increments never race with each other.
//!
//! The conduit is unbounded unless a capacity is given. With a capacity, a
//! full queue drops the click instead of blocking the redirect.
//!
//! Shutdown happens when the last [`ClickSender`] is dropped: the worker
//! applies whatever is still queued and exits. Clicks still queued when the
//! process crashes are lost.

use std::sync::Arc;

use metrics::counter;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinError, JoinHandle};
use tracing::{Level, debug, info, warn};

use crate::domain::click_event::{ClickEvent, ClickMessage};
use crate::domain::repositories::UrlRepository;

#[derive(Clone)]
enum Conduit {
    Unbounded(mpsc::UnboundedSender<ClickMessage>),
    Bounded(mpsc::Sender<ClickMessage>),
}

/// Producer side of the click pipeline. Cheap to clone.
#[derive(Clone)]
pub struct ClickSender {
    conduit: Conduit,
}

/// Consumer side of the click pipeline.
pub enum ClickReceiver {
    Unbounded(mpsc::UnboundedReceiver<ClickMessage>),
    Bounded(mpsc::Receiver<ClickMessage>),
}

impl ClickReceiver {
    /// Waits for the next message; `None` once every sender is gone and the
    /// queue is empty.
    pub async fn recv(&mut self) -> Option<ClickMessage> {
        match self {
            ClickReceiver::Unbounded(rx) => rx.recv().await,
            ClickReceiver::Bounded(rx) => rx.recv().await,
        }
    }
}

/// Creates a click conduit. `None` or `Some(0)` means unbounded.
pub fn click_channel(capacity: Option<usize>) -> (ClickSender, ClickReceiver) {
    match capacity {
        Some(capacity) if capacity > 0 => {
            let (tx, rx) = mpsc::channel(capacity);
            (
                ClickSender {
                    conduit: Conduit::Bounded(tx),
                },
                ClickReceiver::Bounded(rx),
            )
        }
        _ => {
            let (tx, rx) = mpsc::unbounded_channel();
            (
                ClickSender {
                    conduit: Conduit::Unbounded(tx),
                },
                ClickReceiver::Unbounded(rx),
            )
        }
    }
}

impl ClickSender {
    /// Queues one click for `id`. Never blocks and never fails.
    ///
    /// A click that cannot be queued (closed pipeline, full bounded queue) is
    /// dropped and logged.
    pub fn record(&self, id: impl Into<String>) {
        let message = ClickMessage::Click(ClickEvent::new(id));

        let dropped = match &self.conduit {
            Conduit::Unbounded(tx) => tx.send(message).err().map(|_| "pipeline closed"),
            Conduit::Bounded(tx) => match tx.try_send(message) {
                Ok(()) => None,
                Err(mpsc::error::TrySendError::Full(_)) => Some("queue full"),
                Err(mpsc::error::TrySendError::Closed(_)) => Some("pipeline closed"),
            },
        };

        if let Some(reason) = dropped {
            counter!("clicks_dropped_total").increment(1);
            warn!(reason, "Dropping click");
        }
    }

    /// Waits until every click queued before this call has been applied.
    ///
    /// Returns `false` if the worker is no longer running.
    pub async fn flush(&self) -> bool {
        let (ack_tx, ack_rx) = oneshot::channel();
        let message = ClickMessage::Flush(ack_tx);

        let sent = match &self.conduit {
            Conduit::Unbounded(tx) => tx.send(message).is_ok(),
            Conduit::Bounded(tx) => tx.send(message).await.is_ok(),
        };

        sent && ack_rx.await.is_ok()
    }

    /// Returns true once the consumer side has been dropped.
    pub fn is_closed(&self) -> bool {
        match &self.conduit {
            Conduit::Unbounded(tx) => tx.is_closed(),
            Conduit::Bounded(tx) => tx.is_closed(),
        }
    }

    /// Free slots in a bounded queue; `None` when unbounded.
    pub fn capacity(&self) -> Option<usize> {
        match &self.conduit {
            Conduit::Unbounded(_) => None,
            Conduit::Bounded(tx) => Some(tx.capacity()),
        }
    }
}

/// Handle to the spawned click worker.
pub struct ClickWorkerHandle {
    handle: JoinHandle<u64>,
}

impl ClickWorkerHandle {
    /// Waits for the worker to drain and exit. Returns the number of clicks
    /// it applied.
    ///
    /// The worker only exits after every [`ClickSender`] is dropped.
    pub async fn join(self) -> Result<u64, JoinError> {
        self.handle.await
    }
}

/// Entry point for wiring the pipeline.
pub struct ClickPipeline;

impl ClickPipeline {
    /// Creates the conduit and spawns its single consumer on the current
    /// Tokio runtime.
    pub fn spawn(
        repository: Arc<dyn UrlRepository>,
        capacity: Option<usize>,
    ) -> (ClickSender, ClickWorkerHandle) {
        let (tx, rx) = click_channel(capacity);
        let handle = tokio::spawn(run_click_worker(rx, repository));
        (tx, ClickWorkerHandle { handle })
    }
}

/// Drains the conduit, applying each click to the repository.
///
/// A failed increment is logged and dropped; the loop keeps consuming.
/// Returns the number of clicks applied once the conduit is closed and empty.
pub async fn run_click_worker(mut rx: ClickReceiver, repository: Arc<dyn UrlRepository>) -> u64 {
    let mut applied = 0u64;

    while let Some(message) = rx.recv().await {
        match message {
            ClickMessage::Click(event) => match repository.register_click(&event.id).await {
                Ok(()) => {
                    applied += 1;
                    counter!("clicks_recorded_total").increment(1);

                    if tracing::enabled!(Level::DEBUG) {
                        let clicks = repository.fetch_click_stats(&event.id).await.unwrap_or(0);
                        debug!(
                            id = %event.id,
                            clicks,
                            queued_ms = event.queued_at.elapsed().as_millis() as u64,
                            "Click registered"
                        );
                    }
                }
                Err(e) => {
                    counter!("clicks_failed_total").increment(1);
                    warn!(id = %event.id, error = %e, "Failed to register click");
                }
            },
            ClickMessage::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }

    info!(applied, "Click worker stopped");
    applied
}
