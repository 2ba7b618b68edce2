//! Producer counters shared between harness threads

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::StreamKind;

/// Ingestion counters
#[derive(Debug, Default)]
pub struct IngestionMetrics {
    /// Density samples handed to the manager
    pub density_sent: AtomicU64,

    /// Position samples handed to the manager
    pub position_sent: AtomicU64,

    /// Queries issued
    pub queries_issued: AtomicU64,
}

impl IngestionMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sample sent on `stream`
    pub fn record_sent(&self, stream: StreamKind) {
        let counter = match stream {
            StreamKind::Density => &self.density_sent,
            StreamKind::Position => &self.position_sent,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a query issued
    pub fn record_query(&self) {
        self.queries_issued.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            density_sent: self.density_sent.load(Ordering::Relaxed),
            position_sent: self.position_sent.load(Ordering::Relaxed),
            queries_issued: self.queries_issued.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub density_sent: u64,
    pub position_sent: u64,
    pub queries_issued: u64,
}
