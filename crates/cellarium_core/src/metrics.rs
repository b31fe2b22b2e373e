//! Run counters and logging setup.
//!
//! Counters are atomics so a shared reference is enough to record into them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Cycle and hook counters for one engine.
#[derive(Debug)]
pub struct Metrics {
    cycle_count: AtomicU64,
    cell_count: AtomicU64,
    hook_calls: AtomicU64,
    hook_failures: AtomicU64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cycle_count: AtomicU64::new(0),
            cell_count: AtomicU64::new(0),
            hook_calls: AtomicU64::new(0),
            hook_failures: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Records a completed cycle with its duration and resulting population.
    pub fn record_cycle(&self, duration: Duration, cells: usize) {
        let cycle = self.cycle_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.cell_count.store(cells as u64, Ordering::Relaxed);

        // Log at info level every 100 cycles
        if cycle.is_multiple_of(100) {
            tracing::info!(
                cycle,
                cells,
                duration_us = duration.as_micros() as u64,
                "Simulation cycle"
            );
        }
    }

    pub fn record_hook(&self, succeeded: bool) {
        self.hook_calls.fetch_add(1, Ordering::Relaxed);
        if !succeeded {
            self.hook_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[must_use]
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn cell_count(&self) -> u64 {
        self.cell_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn hook_calls(&self) -> u64 {
        self.hook_calls.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn hook_failures(&self) -> u64 {
        self.hook_failures.load(Ordering::Relaxed)
    }

    /// Time since the engine was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Installs a stderr subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter`. Safe to call more than once; later calls are ignored.
pub fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = Metrics::new();
        assert_eq!(metrics.cycle_count(), 0);
        assert_eq!(metrics.hook_calls(), 0);
    }

    #[test]
    fn test_record_cycle() {
        let metrics = Metrics::new();
        metrics.record_cycle(Duration::from_millis(2), 12);
        assert_eq!(metrics.cycle_count(), 1);
        assert_eq!(metrics.cell_count(), 12);
    }

    #[test]
    fn test_record_hook_counts_failures() {
        let metrics = Metrics::new();
        metrics.record_hook(true);
        metrics.record_hook(false);
        assert_eq!(metrics.hook_calls(), 2);
        assert_eq!(metrics.hook_failures(), 1);
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging("warn");
        init_logging("debug");
    }
}
