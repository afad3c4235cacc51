//! Dispatch metrics

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

/// Invocation metrics, split into reads and writes
#[derive(Debug)]
pub struct DispatchMetrics {
    // Read metrics
    read_count: AtomicU64,
    read_latency_us: AtomicU64,
    read_errors: AtomicU64,

    // Write metrics
    write_count: AtomicU64,
    write_latency_us: AtomicU64,
    write_errors: AtomicU64,

    // Invocations rejected before reaching a repository
    rejected_count: AtomicU64,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self {
            read_count: AtomicU64::new(0),
            read_latency_us: AtomicU64::new(0),
            read_errors: AtomicU64::new(0),
            write_count: AtomicU64::new(0),
            write_latency_us: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
            rejected_count: AtomicU64::new(0),
        }
    }

    /// Record a read operation
    pub fn record_read(&self, duration: Duration, error: bool) {
        self.read_count.fetch_add(1, Ordering::Relaxed);
        self.read_latency_us.fetch_add(micros(duration), Ordering::Relaxed);
        if error {
            self.read_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a write operation
    pub fn record_write(&self, duration: Duration, error: bool) {
        self.write_count.fetch_add(1, Ordering::Relaxed);
        self.write_latency_us.fetch_add(micros(duration), Ordering::Relaxed);
        if error {
            self.write_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record an invocation that failed to parse
    pub fn record_rejected(&self) {
        self.rejected_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        let read_count = self.read_count.load(Ordering::Relaxed);
        let write_count = self.write_count.load(Ordering::Relaxed);

        let read_latency_us = self.read_latency_us.load(Ordering::Relaxed);
        let write_latency_us = self.write_latency_us.load(Ordering::Relaxed);

        MetricsSnapshot {
            read_count,
            read_avg_latency_us: if read_count > 0 { read_latency_us / read_count } else { 0 },
            read_errors: self.read_errors.load(Ordering::Relaxed),
            write_count,
            write_avg_latency_us: if write_count > 0 { write_latency_us / write_count } else { 0 },
            write_errors: self.write_errors.load(Ordering::Relaxed),
            rejected_count: self.rejected_count.load(Ordering::Relaxed),
        }
    }

    /// Reset all metrics
    pub fn reset(&self) {
        self.read_count.store(0, Ordering::Relaxed);
        self.read_latency_us.store(0, Ordering::Relaxed);
        self.read_errors.store(0, Ordering::Relaxed);
        self.write_count.store(0, Ordering::Relaxed);
        self.write_latency_us.store(0, Ordering::Relaxed);
        self.write_errors.store(0, Ordering::Relaxed);
        self.rejected_count.store(0, Ordering::Relaxed);
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub read_count: u64,
    pub read_avg_latency_us: u64,
    pub read_errors: u64,
    pub write_count: u64,
    pub write_avg_latency_us: u64,
    pub write_errors: u64,
    pub rejected_count: u64,
}

/// Helper to measure operation duration
pub struct OpTimer {
    start: Instant,
}

impl OpTimer {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for OpTimer {
    fn default() -> Self {
        Self::new()
    }
}
