//! Delivery metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one distributor instance
#[derive(Debug, Default)]
pub struct DeliveryMetrics {
    /// Total entry copies forwarded to derived channels
    forwarded_count: AtomicU64,
    /// Total completion notifications published
    notified_count: AtomicU64,
    /// Total entries acknowledged (deleted from the incoming channel)
    acknowledged_count: AtomicU64,
    /// Total entries dropped by the malformed-entry policy
    dropped_count: AtomicU64,
    /// Total batches read from the incoming channel
    batch_count: AtomicU64,
}

impl DeliveryMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total forwarded copy count
    pub fn forwarded_count(&self) -> u64 {
        self.forwarded_count.load(Ordering::Relaxed)
    }

    /// Increment forwarded copy count
    pub fn inc_forwarded_count(&self) {
        self.forwarded_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get notification count
    pub fn notified_count(&self) -> u64 {
        self.notified_count.load(Ordering::Relaxed)
    }

    /// Increment notification count
    pub fn inc_notified_count(&self) {
        self.notified_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get acknowledged entry count
    pub fn acknowledged_count(&self) -> u64 {
        self.acknowledged_count.load(Ordering::Relaxed)
    }

    /// Increment acknowledged entry count
    pub fn inc_acknowledged_count(&self) {
        self.acknowledged_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get dropped entry count
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    /// Increment dropped entry count
    pub fn inc_dropped_count(&self) {
        self.dropped_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get batch count
    pub fn batch_count(&self) -> u64 {
        self.batch_count.load(Ordering::Relaxed)
    }

    /// Increment batch count
    pub fn inc_batch_count(&self) {
        self.batch_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> DeliverySnapshot {
        DeliverySnapshot {
            forwarded_count: self.forwarded_count(),
            notified_count: self.notified_count(),
            acknowledged_count: self.acknowledged_count(),
            dropped_count: self.dropped_count(),
            batch_count: self.batch_count(),
        }
    }
}

/// Snapshot of delivery counters (for reporting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliverySnapshot {
    pub forwarded_count: u64,
    pub notified_count: u64,
    pub acknowledged_count: u64,
    pub dropped_count: u64,
    pub batch_count: u64,
}
