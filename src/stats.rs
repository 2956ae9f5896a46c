//! Call statistics
//!
//! Process-wide counters owned by the orchestrator and incremented by the
//! dispatcher. Atomic so concurrent `run()` calls never lose updates.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct CallStats {
    total_calls: AtomicU64,
    successful_calls: AtomicU64,
    failed_calls: AtomicU64,
}

impl CallStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_dispatch(&self, decision_count: u64) {
        self.total_calls.fetch_add(decision_count, Ordering::Relaxed);
    }

    pub fn record_success(&self) {
        self.successful_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total_calls(&self) -> u64 {
        self.total_calls.load(Ordering::Relaxed)
    }

    pub fn successful_calls(&self) -> u64 {
        self.successful_calls.load(Ordering::Relaxed)
    }

    pub fn failed_calls(&self) -> u64 {
        self.failed_calls.load(Ordering::Relaxed)
    }

    /// Percentage of successful calls; 0.0 before any call has been made.
    pub fn success_rate(&self) -> f64 {
        let total = self.total_calls().max(1);
        (self.successful_calls() as f64 / total as f64) * 100.0
    }
}
