//! Delivery counters
//!
//! - Counters only, monotonic, reset on process start
//! - Relaxed atomics; exactness across counters is not required

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for the catalog and its delivery modes
#[derive(Debug, Default)]
pub struct DeliveryMetrics {
    mutations_applied: AtomicU64,
    mutations_rejected: AtomicU64,
    short_pulls: AtomicU64,
    long_pulls_changed: AtomicU64,
    long_pulls_timed_out: AtomicU64,
    streams_started: AtomicU64,
    streams_completed: AtomicU64,
    streams_cancelled: AtomicU64,
    events_emitted: AtomicU64,
}

/// Point-in-time copy of all counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub mutations_applied: u64,
    pub mutations_rejected: u64,
    pub short_pulls: u64,
    pub long_pulls_changed: u64,
    pub long_pulls_timed_out: u64,
    pub streams_started: u64,
    pub streams_completed: u64,
    pub streams_cancelled: u64,
    pub events_emitted: u64,
}

impl DeliveryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_mutations_applied(&self) {
        self.mutations_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_mutations_rejected(&self) {
        self.mutations_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_short_pulls(&self) {
        self.short_pulls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_long_pulls_changed(&self) {
        self.long_pulls_changed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_long_pulls_timed_out(&self) {
        self.long_pulls_timed_out.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_streams_started(&self) {
        self.streams_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_streams_completed(&self) {
        self.streams_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_streams_cancelled(&self) {
        self.streams_cancelled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_events_emitted(&self) {
        self.events_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn streams_cancelled(&self) -> u64 {
        self.streams_cancelled.load(Ordering::Relaxed)
    }

    pub fn streams_completed(&self) -> u64 {
        self.streams_completed.load(Ordering::Relaxed)
    }

    /// Copy all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            mutations_applied: self.mutations_applied.load(Ordering::Relaxed),
            mutations_rejected: self.mutations_rejected.load(Ordering::Relaxed),
            short_pulls: self.short_pulls.load(Ordering::Relaxed),
            long_pulls_changed: self.long_pulls_changed.load(Ordering::Relaxed),
            long_pulls_timed_out: self.long_pulls_timed_out.load(Ordering::Relaxed),
            streams_started: self.streams_started.load(Ordering::Relaxed),
            streams_completed: self.streams_completed.load(Ordering::Relaxed),
            streams_cancelled: self.streams_cancelled.load(Ordering::Relaxed),
            events_emitted: self.events_emitted.load(Ordering::Relaxed),
        }
    }
}
