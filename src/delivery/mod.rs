//! # Change Delivery
//!
//! The three ways a client observes the catalog:
//!
//! - **Short pull**: [`ChangePublisher::snapshot`](crate::catalog::ChangePublisher::snapshot),
//!   no waiting
//! - **Long pull**: [`AwaitChange`], waits for the revision to move or a timeout
//! - **Incremental**: [`IncrementalEmitter`], one record per tick over a
//!   persistent connection
//!
//! None of these hold the catalog lock while sleeping.

pub mod await_change;
pub mod config;
pub mod incremental;
pub mod metrics;

pub use await_change::{AwaitChange, AwaitOutcome};
pub use config::{DeliveryConfig, DeliveryConfigError};
pub use incremental::{IncrementalEmitter, IncrementalStream};
pub use metrics::{DeliveryMetrics, MetricsSnapshot};
