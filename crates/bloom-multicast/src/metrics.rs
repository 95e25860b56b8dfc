//! Metrics for membership and forwarding operations
//!
//! Counters for filter traffic, tree churn and multicast fan-out.
//!
//! ## Usage
//!
//! ```ignore
//! use bloom_multicast::metrics::{Metrics, MetricsRecorder};
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(Metrics::new());
//! let service = BloomMembershipService::new(local, config, routing, transport)
//!     .with_metrics(metrics.clone());
//!
//! service.do_maintenance()?;
//! println!("{:?}", metrics.snapshot());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

/// Metrics collector for membership operations
///
/// Thread-safe counters; readable from any thread while the actor runs.
#[derive(Default)]
pub struct Metrics {
    /// Changed filters pushed to a peer (counted once per peer, not per link)
    pub filters_sent: AtomicU64,
    /// On-tree peers whose filter did not change during a pass
    pub filters_unchanged: AtomicU64,
    /// Filter updates accepted from peers
    pub filters_received: AtomicU64,
    /// Filter updates dropped as malformed
    pub filters_rejected: AtomicU64,
    /// Peers that dropped off the tree
    pub tree_departures: AtomicU64,
    /// Multicast copies enqueued
    pub multicast_forwarded: AtomicU64,
    /// Multicast copies skipped on a definite negative
    pub multicast_suppressed: AtomicU64,
    /// Completed maintenance passes
    pub maintenance_runs: AtomicU64,
    /// Cumulative maintenance time in nanoseconds
    pub maintenance_time_ns: AtomicU64,
    /// Invariant violations detected
    pub invariant_violations: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_filter_sent(&self) {
        self.filters_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_filter_unchanged(&self) {
        self.filters_unchanged.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an incoming filter update
    ///
    /// # Arguments
    /// * `accepted` - false if the payload failed to decode
    pub fn record_filter_received(&self, accepted: bool) {
        if accepted {
            self.filters_received.fetch_add(1, Ordering::Relaxed);
        } else {
            self.filters_rejected.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_tree_departure(&self) {
        self.tree_departures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_multicast(&self, forwarded: usize, suppressed: usize) {
        self.multicast_forwarded
            .fetch_add(forwarded as u64, Ordering::Relaxed);
        self.multicast_suppressed
            .fetch_add(suppressed as u64, Ordering::Relaxed);
    }

    pub fn record_maintenance(&self, duration: Duration) {
        self.maintenance_runs.fetch_add(1, Ordering::Relaxed);
        self.maintenance_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn record_invariant_violation(&self) {
        self.invariant_violations.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            filters_sent: self.filters_sent.load(Ordering::Relaxed),
            filters_unchanged: self.filters_unchanged.load(Ordering::Relaxed),
            filters_received: self.filters_received.load(Ordering::Relaxed),
            filters_rejected: self.filters_rejected.load(Ordering::Relaxed),
            tree_departures: self.tree_departures.load(Ordering::Relaxed),
            multicast_forwarded: self.multicast_forwarded.load(Ordering::Relaxed),
            multicast_suppressed: self.multicast_suppressed.load(Ordering::Relaxed),
            maintenance_runs: self.maintenance_runs.load(Ordering::Relaxed),
            avg_maintenance_ns: self.avg_maintenance_time_ns(),
            invariant_violations: self.invariant_violations.load(Ordering::Relaxed),
        }
    }

    pub fn avg_maintenance_time_ns(&self) -> u64 {
        let total = self.maintenance_time_ns.load(Ordering::Relaxed);
        let count = self.maintenance_runs.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    /// Fraction of on-tree peer checks that ended in a definite negative.
    pub fn suppression_rate(&self) -> f64 {
        let forwarded = self.multicast_forwarded.load(Ordering::Relaxed);
        let suppressed = self.multicast_suppressed.load(Ordering::Relaxed);
        let total = forwarded + suppressed;
        if total > 0 {
            suppressed as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        for counter in [
            &self.filters_sent,
            &self.filters_unchanged,
            &self.filters_received,
            &self.filters_rejected,
            &self.tree_departures,
            &self.multicast_forwarded,
            &self.multicast_suppressed,
            &self.maintenance_runs,
            &self.maintenance_time_ns,
            &self.invariant_violations,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub filters_sent: u64,
    pub filters_unchanged: u64,
    pub filters_received: u64,
    pub filters_rejected: u64,
    pub tree_departures: u64,
    pub multicast_forwarded: u64,
    pub multicast_suppressed: u64,
    pub maintenance_runs: u64,
    pub avg_maintenance_ns: u64,
    pub invariant_violations: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this to bridge into Prometheus, StatsD or similar.
pub trait MetricsRecorder: Send + Sync {
    fn record_filter_sent(&self);
    fn record_filter_unchanged(&self);
    fn record_filter_received(&self, accepted: bool);
    fn record_tree_departure(&self);
    fn record_multicast(&self, forwarded: usize, suppressed: usize);
    fn record_maintenance(&self, duration: Duration);
    fn record_invariant_violation(&self);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_filter_sent(&self) {}
    fn record_filter_unchanged(&self) {}
    fn record_filter_received(&self, _: bool) {}
    fn record_tree_departure(&self) {}
    fn record_multicast(&self, _: usize, _: usize) {}
    fn record_maintenance(&self, _: Duration) {}
    fn record_invariant_violation(&self) {}
}

impl MetricsRecorder for Metrics {
    fn record_filter_sent(&self) {
        Metrics::record_filter_sent(self);
    }

    fn record_filter_unchanged(&self) {
        Metrics::record_filter_unchanged(self);
    }

    fn record_filter_received(&self, accepted: bool) {
        Metrics::record_filter_received(self, accepted);
    }

    fn record_tree_departure(&self) {
        Metrics::record_tree_departure(self);
    }

    fn record_multicast(&self, forwarded: usize, suppressed: usize) {
        Metrics::record_multicast(self, forwarded, suppressed);
    }

    fn record_maintenance(&self, duration: Duration) {
        Metrics::record_maintenance(self, duration);
    }

    fn record_invariant_violation(&self) {
        Metrics::record_invariant_violation(self);
    }
}
