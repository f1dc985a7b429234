//! Dedup metrics for observability
//!
//! Counts how much work the middleware is doing: records forwarded,
//! downstream failures, and what happened to individual keys.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by a dedup handler and every handler derived from it
///
/// # Example
///
/// ```
/// use log_dedup::DedupMetrics;
///
/// let metrics = DedupMetrics::new();
///
/// metrics.record_handled();
/// metrics.record_collapsed();
///
/// assert_eq!(metrics.records_handled(), 1);
/// assert_eq!(metrics.keys_collapsed(), 1);
/// ```
#[derive(Debug)]
pub struct DedupMetrics {
    /// Records forwarded to the next handler
    records_handled: AtomicU64,

    /// Records the next handler returned an error for
    sink_failures: AtomicU64,

    /// Keys a resolver dropped
    keys_dropped: AtomicU64,

    /// Keys written under a name other than the one they arrived with
    keys_renamed: AtomicU64,

    /// Keys merged into an entry that already existed
    keys_collapsed: AtomicU64,
}

impl DedupMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            records_handled: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            keys_dropped: AtomicU64::new(0),
            keys_renamed: AtomicU64::new(0),
            keys_collapsed: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_handled(&self) -> u64 {
        self.records_handled.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn keys_dropped(&self) -> u64 {
        self.keys_dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn keys_renamed(&self) -> u64 {
        self.keys_renamed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn keys_collapsed(&self) -> u64 {
        self.keys_collapsed.load(Ordering::Relaxed)
    }

    /// Record a record forwarded downstream
    #[inline]
    pub fn record_handled(&self) -> u64 {
        self.records_handled.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a downstream failure
    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.keys_dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_renamed(&self) -> u64 {
        self.keys_renamed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_collapsed(&self) -> u64 {
        self.keys_collapsed.fetch_add(1, Ordering::Relaxed)
    }

    /// Average number of collapsed keys per handled record
    ///
    /// Returns 0.0 if no records have been handled.
    pub fn collapse_rate(&self) -> f64 {
        let handled = self.records_handled() as f64;
        if handled == 0.0 {
            0.0
        } else {
            self.keys_collapsed() as f64 / handled
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.records_handled.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
        self.keys_dropped.store(0, Ordering::Relaxed);
        self.keys_renamed.store(0, Ordering::Relaxed);
        self.keys_collapsed.store(0, Ordering::Relaxed);
    }
}

impl Default for DedupMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DedupMetrics {
    /// Create a snapshot of the current counter values
    fn clone(&self) -> Self {
        Self {
            records_handled: AtomicU64::new(self.records_handled()),
            sink_failures: AtomicU64::new(self.sink_failures()),
            keys_dropped: AtomicU64::new(self.keys_dropped()),
            keys_renamed: AtomicU64::new(self.keys_renamed()),
            keys_collapsed: AtomicU64::new(self.keys_collapsed()),
        }
    }
}
