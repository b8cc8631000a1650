//! Metrics collection for the mining engine
//!
//! Workers count attempts locally and report once when they exit, so the
//! hash loop never touches these counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for mining
#[derive(Debug, Default)]
pub struct MiningMetrics {
    /// Total candidate hashes computed
    pub attempts: AtomicU64,

    /// Total `mine` calls that returned a block
    pub blocks_found: AtomicU64,

    /// Total `mine` calls that ended interrupted
    pub interrupted: AtomicU64,

    /// Total time spent inside `mine` (milliseconds)
    pub mining_time_ms: AtomicU64,
}

impl MiningMetrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record hashes computed by one worker
    pub fn record_attempts(&self, attempts: u64) {
        self.attempts.fetch_add(attempts, Ordering::Relaxed);
    }

    /// Record the outcome of one `mine` call
    pub fn record_search(&self, found: bool, duration_ms: u64) {
        if found {
            self.blocks_found.fetch_add(1, Ordering::Relaxed);
        } else {
            self.interrupted.fetch_add(1, Ordering::Relaxed);
        }
        self.mining_time_ms.fetch_add(duration_ms, Ordering::Relaxed);
    }

    /// Get total attempts
    pub fn get_attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Get blocks found
    pub fn get_blocks_found(&self) -> u64 {
        self.blocks_found.load(Ordering::Relaxed)
    }

    /// Get interrupted searches
    pub fn get_interrupted(&self) -> u64 {
        self.interrupted.load(Ordering::Relaxed)
    }

    /// Average hash rate over all time spent mining (hashes per second)
    pub fn get_hashrate(&self) -> f64 {
        let ms = self.mining_time_ms.load(Ordering::Relaxed);
        if ms == 0 {
            return 0.0;
        }
        self.get_attempts() as f64 * 1000.0 / ms as f64
    }
}
