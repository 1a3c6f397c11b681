//! Incremental emitter
//!
//! Streams the catalog one record at a time with a fixed pause between
//! records. The catalog is snapshotted once at stream start and the lock is
//! released before the first record is produced; later mutations are not
//! reflected in a running stream.
//!
//! A producer task feeds a bounded channel and the consumer side is exposed
//! as a [`Stream`]. Each record travels with a hand-off signal that the
//! stream fires when it yields the record; the pause before the next record
//! starts only then, so a late reader still sees the full interval between
//! consecutive records. Dropping the stream closes the channel, which wakes
//! the producer even while it is pausing, so no task outlives its consumer.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::Stream;
use tokio::sync::{mpsc, oneshot};
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

use crate::catalog::{ChangePublisher, CollectionStore, Producto};

use super::metrics::DeliveryMetrics;

/// Records buffered between producer and consumer
const CHANNEL_CAPACITY: usize = 1;

/// A record plus the signal fired when the consumer takes it
type Handoff = (Producto, oneshot::Sender<()>);

/// Factory for timed, one-record-at-a-time streams.
#[derive(Debug, Clone)]
pub struct IncrementalEmitter {
    interval: Duration,
    metrics: Arc<DeliveryMetrics>,
}

impl IncrementalEmitter {
    pub fn new(interval: Duration) -> Self {
        Self::with_metrics(interval, Arc::new(DeliveryMetrics::new()))
    }

    pub fn with_metrics(interval: Duration, metrics: Arc<DeliveryMetrics>) -> Self {
        Self { interval, metrics }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Snapshot the catalog and start streaming it.
    ///
    /// Must be called within a tokio runtime.
    pub fn stream<S: CollectionStore>(&self, publisher: &ChangePublisher<S>) -> IncrementalStream {
        let snapshot = publisher.snapshot();
        self.stream_records(snapshot.productos)
    }

    /// Stream an already captured record set.
    pub fn stream_records(&self, productos: Vec<Producto>) -> IncrementalStream {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let total = productos.len();
        let interval = self.interval;
        let metrics = self.metrics.clone();

        metrics.increment_streams_started();
        debug!(total, interval_ms = interval.as_millis() as u64, "incremental stream started");

        tokio::spawn(produce(productos, interval, tx, metrics));

        IncrementalStream {
            inner: ReceiverStream::new(rx),
            total,
        }
    }
}

async fn produce(
    productos: Vec<Producto>,
    interval: Duration,
    tx: mpsc::Sender<Handoff>,
    metrics: Arc<DeliveryMetrics>,
) {
    let mut remaining = productos.into_iter().peekable();
    let mut sent = 0usize;

    while let Some(producto) = remaining.next() {
        let (taken_tx, taken_rx) = oneshot::channel();
        if tx.send((producto, taken_tx)).await.is_err() {
            metrics.increment_streams_cancelled();
            debug!(sent, "incremental stream consumer went away");
            return;
        }

        let taken = tokio::select! {
            biased;
            taken = taken_rx => taken.is_ok(),
            _ = tx.closed() => false,
        };
        if !taken {
            metrics.increment_streams_cancelled();
            debug!(sent, "incremental stream consumer went away");
            return;
        }
        sent += 1;
        metrics.increment_events_emitted();

        if remaining.peek().is_none() {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tx.closed() => {
                metrics.increment_streams_cancelled();
                debug!(sent, "incremental stream consumer went away");
                return;
            }
        }
    }

    metrics.increment_streams_completed();
    debug!(sent, "incremental stream finished");
}

/// Consumer side of an incremental stream. Ends after the last record.
#[derive(Debug)]
pub struct IncrementalStream {
    inner: ReceiverStream<Handoff>,
    total: usize,
}

impl IncrementalStream {
    /// Number of records the stream will yield if fully consumed
    pub fn total(&self) -> usize {
        self.total
    }
}

impl Stream for IncrementalStream {
    type Item = Producto;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx).map(|item| {
            item.map(|(producto, taken)| {
                let _ = taken.send(());
                producto
            })
        })
    }
}
