//! Solver statistics collection and reporting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

/// Counters for one solve.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SolverStatistics {
    /// Search nodes taken off the stack.
    pub nodes: u64,
    /// LP relaxations solved.
    pub relaxations: u64,
    /// Simplex pivots across all relaxations.
    pub pivots: u64,
    /// Improving integer solutions found.
    pub incumbents: u64,
    /// Nodes discarded by bound or infeasibility.
    pub pruned: u64,
    /// Nodes dropped because their relaxation failed.
    pub abandoned: u64,
    pub elapsed: Duration,
}

impl SolverStatistics {
    /// Nodes per second over the whole solve.
    pub fn node_rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.nodes as f64 / secs
        }
    }
}

/// Thread-safe collector for solver statistics.
///
/// Call [`snapshot`](Self::snapshot) at any time to read the counters.
#[derive(Debug)]
pub struct StatisticsCollector {
    start_time: Instant,
    nodes: AtomicU64,
    relaxations: AtomicU64,
    pivots: AtomicU64,
    incumbents: AtomicU64,
    pruned: AtomicU64,
    abandoned: AtomicU64,
}

impl StatisticsCollector {
    /// Creates a collector; the clock starts now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            nodes: AtomicU64::new(0),
            relaxations: AtomicU64::new(0),
            pivots: AtomicU64::new(0),
            incumbents: AtomicU64::new(0),
            pruned: AtomicU64::new(0),
            abandoned: AtomicU64::new(0),
        }
    }

    pub fn record_node(&self) {
        self.nodes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_relaxation(&self, pivots: u64) {
        self.relaxations.fetch_add(1, Ordering::Relaxed);
        self.pivots.fetch_add(pivots, Ordering::Relaxed);
    }

    pub fn record_incumbent(&self) {
        self.incumbents.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_pruned(&self) {
        self.pruned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_abandoned(&self) {
        self.abandoned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn node_count(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn snapshot(&self) -> SolverStatistics {
        SolverStatistics {
            nodes: self.nodes.load(Ordering::Relaxed),
            relaxations: self.relaxations.load(Ordering::Relaxed),
            pivots: self.pivots.load(Ordering::Relaxed),
            incumbents: self.incumbents.load(Ordering::Relaxed),
            pruned: self.pruned.load(Ordering::Relaxed),
            abandoned: self.abandoned.load(Ordering::Relaxed),
            elapsed: self.elapsed(),
        }
    }
}

impl Default for StatisticsCollector {
    fn default() -> Self {
        Self::new()
    }
}
