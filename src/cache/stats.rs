//! Cache statistics types
//!
//! - `StorageStats`: what a backend currently holds (entries, expired entries, bytes)
//! - `ViewCacheStats`: runtime counters of the view cache facade (hits, misses, GC runs)

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of a storage backend's contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StorageStats {
    /// Backend name (`file`, `redis`)
    pub backend: String,
    /// Number of stored entries, expired or not
    pub entries: u64,
    /// Entries past their expiry that GC would remove
    pub expired_entries: u64,
    /// Total content size in bytes (0 when the backend cannot tell)
    pub size_bytes: u64,
}

impl StorageStats {
    pub fn new(backend: &str) -> Self {
        Self {
            backend: backend.to_string(),
            ..Default::default()
        }
    }

    pub fn live_entries(&self) -> u64 {
        self.entries.saturating_sub(self.expired_entries)
    }
}

/// Point-in-time copy of [`ViewCacheCounters`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViewCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub write_failures: u64,
    pub gc_runs: u64,
    pub gc_collected: u64,
}

impl ViewCacheStats {
    /// Calculate hit rate (hits / total lookups)
    /// Returns 0.0 if there were no lookups
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Lock-free counters updated by the view cache
#[derive(Debug, Default)]
pub struct ViewCacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    write_failures: AtomicU64,
    gc_runs: AtomicU64,
    gc_collected: AtomicU64,
}

impl ViewCacheCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write_failure(&self) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_gc(&self, collected: usize) {
        self.gc_runs.fetch_add(1, Ordering::Relaxed);
        self.gc_collected
            .fetch_add(collected as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ViewCacheStats {
        ViewCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
            gc_runs: self.gc_runs.load(Ordering::Relaxed),
            gc_collected: self.gc_collected.load(Ordering::Relaxed),
        }
    }
}
