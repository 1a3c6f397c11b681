//! Shared handler state

use std::sync::Arc;

use crate::catalog::ChangePublisher;
use crate::delivery::{AwaitChange, DeliveryConfig, DeliveryMetrics, IncrementalEmitter};

/// Catalog state shared by every listener and handler
pub struct CatalogState {
    pub publisher: Arc<ChangePublisher>,
    pub delivery: DeliveryConfig,
    pub metrics: Arc<DeliveryMetrics>,
}

impl CatalogState {
    pub fn new(delivery: DeliveryConfig) -> Self {
        Self::with_publisher(Arc::new(ChangePublisher::new()), delivery)
    }

    pub fn with_publisher(publisher: Arc<ChangePublisher>, delivery: DeliveryConfig) -> Self {
        Self {
            publisher,
            delivery,
            metrics: Arc::new(DeliveryMetrics::new()),
        }
    }

    /// Long-poll waiter with the configured timing
    pub fn await_change(&self) -> AwaitChange {
        AwaitChange::from_config(&self.delivery)
    }

    /// Emitter pacing at `interval_ms`, or the configured default
    pub fn emitter(&self, interval_ms: Option<u64>) -> IncrementalEmitter {
        let interval = interval_ms
            .map(std::time::Duration::from_millis)
            .unwrap_or_else(|| self.delivery.emit_interval());
        IncrementalEmitter::with_metrics(interval, self.metrics.clone())
    }
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::new(DeliveryConfig::default())
    }
}
