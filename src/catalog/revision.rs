//! Revision clock
//!
//! A single "last modified" marker for the whole catalog:
//! - Totally ordered by sequence number
//! - Advanced exactly once per successful mutation
//! - Never moves backwards, even if the wall clock does
//!
//! The clock has no synchronization of its own. It lives inside the change
//! publisher's critical section next to the store it describes.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Opaque, totally ordered revision of the catalog.
///
/// Ordering is decided by `sequence`; `updated_at` is the wall-clock instant
/// the revision was produced and is reported to clients as
/// `ultima_actualizacion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RevisionMarker {
    sequence: u64,
    updated_at: DateTime<Utc>,
}

impl RevisionMarker {
    /// Initial marker of a freshly created catalog
    pub fn origin(at: DateTime<Utc>) -> Self {
        Self {
            sequence: 0,
            updated_at: at,
        }
    }

    /// Number of successful mutations this marker accounts for
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Wall-clock instant of the last successful mutation
    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Monotonic marker source.
#[derive(Debug, Clone)]
pub struct RevisionClock {
    current: RevisionMarker,
}

impl RevisionClock {
    /// Create a clock whose origin is the current instant
    pub fn new() -> Self {
        Self {
            current: RevisionMarker::origin(Utc::now()),
        }
    }

    /// Current marker
    #[inline]
    pub fn current(&self) -> RevisionMarker {
        self.current
    }

    /// Advance to a new marker stamped with the current instant.
    pub fn advance(&mut self) -> RevisionMarker {
        self.advance_at(Utc::now())
    }

    /// Advance to a new marker stamped with `now`.
    ///
    /// A `now` earlier than the previous stamp is clamped to it.
    pub fn advance_at(&mut self, now: DateTime<Utc>) -> RevisionMarker {
        self.current = RevisionMarker {
            sequence: self.current.sequence + 1,
            updated_at: now.max(self.current.updated_at),
        };
        self.current
    }
}

impl Default for RevisionClock {
    fn default() -> Self {
        Self::new()
    }
}
