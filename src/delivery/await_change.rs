//! Long-poll responder
//!
//! Holds a request open until the catalog revision moves past the value seen
//! at request start, or until the maximum wait elapses.
//!
//! The wait is a plain future: when the peer disconnects the server drops
//! it, which stops the ticker and the deadline with no task left behind.
//! Several mutations within one poll interval are reported once, as the
//! latest snapshot.

use std::time::Duration;

use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::debug;

use crate::catalog::{ChangePublisher, CollectionStore, RevisionMarker, Snapshot};

use super::config::DeliveryConfig;

/// Terminal state of a long poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AwaitOutcome {
    /// The revision moved; carries the snapshot read at detection time
    Changed(Snapshot),
    /// No change was observed within the maximum wait
    TimedOut,
}

impl AwaitOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, AwaitOutcome::Changed(_))
    }
}

/// Polling waiter with a fixed cadence and a bounded wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AwaitChange {
    poll_interval: Duration,
    max_wait: Duration,
}

impl AwaitChange {
    pub fn new(poll_interval: Duration, max_wait: Duration) -> Self {
        Self {
            poll_interval,
            max_wait,
        }
    }

    pub fn from_config(config: &DeliveryConfig) -> Self {
        Self::new(config.poll_interval(), config.max_wait())
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    /// Capture the current revision as baseline and wait for it to move.
    pub async fn wait<S: CollectionStore>(&self, publisher: &ChangePublisher<S>) -> AwaitOutcome {
        let baseline = publisher.revision();
        self.wait_since(publisher, baseline).await
    }

    /// Wait for the revision to differ from `baseline`.
    ///
    /// The first check happens one poll interval after the call, never
    /// immediately. The lock is taken once per tick and released before the
    /// next sleep.
    pub async fn wait_since<S: CollectionStore>(
        &self,
        publisher: &ChangePublisher<S>,
        baseline: RevisionMarker,
    ) -> AwaitOutcome {
        let start = Instant::now();
        let deadline = sleep(self.max_wait);
        tokio::pin!(deadline);

        let mut ticker = interval_at(start + self.poll_interval, self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = ticker.tick() => {
                    if let Some(snapshot) = publisher.snapshot_if_changed(baseline) {
                        debug!(
                            baseline = baseline.sequence(),
                            revision = snapshot.revision.sequence(),
                            waited_ms = start.elapsed().as_millis() as u64,
                            "long poll observed change"
                        );
                        return AwaitOutcome::Changed(snapshot);
                    }
                }
                _ = &mut deadline => {
                    debug!(baseline = baseline.sequence(), "long poll timed out");
                    return AwaitOutcome::TimedOut;
                }
            }
        }
    }
}

impl Default for AwaitChange {
    fn default() -> Self {
        Self::from_config(&DeliveryConfig::default())
    }
}
