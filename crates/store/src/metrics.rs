//! Write-path counters for the vector store
//!
//! Cheap atomic counters on every mutating operation. They make write
//! activity observable without touching the data path: a maintenance no-op
//! can be asserted as "zero writes happened" instead of diffing collection
//! contents.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters tracking store mutations.
#[derive(Debug, Default)]
pub struct StoreMetrics {
    hot_upserts: AtomicU64,
    cold_upserts: AtomicU64,
    hot_deletes: AtomicU64,
    cold_deletes: AtomicU64,
    drains: AtomicU64,
    index_builds: AtomicU64,
    index_drops: AtomicU64,
}

impl StoreMetrics {
    pub(crate) fn record_hot_upsert(&self) {
        self.hot_upserts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cold_upserts(&self, n: u64) {
        self.cold_upserts.fetch_add(n, Ordering::Relaxed);
    }

    pub(crate) fn record_hot_deletes(&self, n: u64) {
        self.hot_deletes.fetch_add(n, Ordering::Relaxed);
    }

    pub(crate) fn record_cold_deletes(&self, n: u64) {
        self.cold_deletes.fetch_add(n, Ordering::Relaxed);
    }

    pub(crate) fn record_drain(&self) {
        self.drains.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_index_build(&self) {
        self.index_builds.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_index_drop(&self) {
        self.index_drops.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            hot_upserts: self.hot_upserts.load(Ordering::Relaxed),
            cold_upserts: self.cold_upserts.load(Ordering::Relaxed),
            hot_deletes: self.hot_deletes.load(Ordering::Relaxed),
            cold_deletes: self.cold_deletes.load(Ordering::Relaxed),
            drains: self.drains.load(Ordering::Relaxed),
            index_builds: self.index_builds.load(Ordering::Relaxed),
            index_drops: self.index_drops.load(Ordering::Relaxed),
        }
    }
}

/// Plain copy of the counters at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    /// Records written into hot collections.
    pub hot_upserts: u64,
    /// Records written into cold collections (all via drain).
    pub cold_upserts: u64,
    /// Records removed from hot collections.
    pub hot_deletes: u64,
    /// Records removed from cold collections.
    pub cold_deletes: u64,
    /// Drain operations executed.
    pub drains: u64,
    /// Similarity indexes built.
    pub index_builds: u64,
    /// Similarity indexes dropped.
    pub index_drops: u64,
}

impl MetricsSnapshot {
    /// Total mutations of any kind; equal snapshots before and after an
    /// operation prove it wrote nothing.
    pub fn total_writes(&self) -> u64 {
        self.hot_upserts
            + self.cold_upserts
            + self.hot_deletes
            + self.cold_deletes
            + self.index_builds
            + self.index_drops
    }
}
