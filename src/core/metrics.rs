//! Per-channel dispatch counters
//!
//! Every channel keeps relaxed atomic counters of what happened to the
//! records it received. They are cheap enough to stay enabled and can be
//! read at any time through [`ChannelMetrics::snapshot`].

use super::log_level::Level;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters of one channel
///
/// # Example
///
/// ```
/// use rust_log_bridge::{ChannelMetrics, Level};
///
/// let metrics = ChannelMetrics::new();
/// metrics.record_logged(Level::Error);
/// metrics.record_skipped();
///
/// let snapshot = metrics.snapshot();
/// assert_eq!(snapshot.logged, 1);
/// assert_eq!(snapshot.skipped, 1);
/// assert_eq!(metrics.logged_at(Level::Error), 1);
/// ```
#[derive(Debug, Default)]
pub struct ChannelMetrics {
    by_level: [AtomicU64; 8],
    skipped: AtomicU64,
    stopped: AtomicU64,
}

/// Point-in-time copy of [`ChannelMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Records handed to at least one handler
    pub logged: u64,
    /// Records no handler was interested in; processors did not run for them
    pub skipped: u64,
    /// Records a handler kept from the handlers after it
    pub stopped: u64,
}

fn slot(level: Level) -> usize {
    Level::ALL.iter().position(|l| *l == level).unwrap_or(0)
}

impl ChannelMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_logged(&self, level: Level) {
        self.by_level[slot(level)].fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stopped(&self) {
        self.stopped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total_logged(&self) -> u64 {
        self.by_level
            .iter()
            .map(|count| count.load(Ordering::Relaxed))
            .sum()
    }

    /// Records of exactly `level` handed to handlers
    pub fn logged_at(&self, level: Level) -> u64 {
        self.by_level[slot(level)].load(Ordering::Relaxed)
    }

    pub fn skipped_count(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    pub fn propagation_stopped(&self) -> u64 {
        self.stopped.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            logged: self.total_logged(),
            skipped: self.skipped_count(),
            stopped: self.propagation_stopped(),
        }
    }

    pub fn reset(&self) {
        for count in &self.by_level {
            count.store(0, Ordering::Relaxed);
        }
        self.skipped.store(0, Ordering::Relaxed);
        self.stopped.store(0, Ordering::Relaxed);
    }
}
