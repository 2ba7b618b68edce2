//! AggregateResult - Density engine output
//!
//! Query results and buffer diagnostics.

use serde::{Deserialize, Serialize};

/// Density statistics over a position interval.
///
/// All fields are zero when no density sample qualified. `count` is the only way
/// to tell "no data" apart from "data that is all zero".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Truncating integer mean
    pub mean: i32,

    /// Smallest qualifying value
    pub min: i32,

    /// Lower-middle median
    pub median: i32,

    /// Number of qualifying samples
    pub count: usize,
}

impl AggregateResult {
    /// True when no sample fell inside the queried interval
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl std::fmt::Display for AggregateResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "mean={}, min={}, median={} (n={})",
            self.mean, self.min, self.median, self.count
        )
    }
}

/// Per-stream buffer status (for diagnostics)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamStats {
    /// Retained samples
    pub depth: usize,

    /// Oldest retained timestamp
    pub oldest_timestamp_us: Option<i64>,

    /// Newest retained timestamp
    pub newest_timestamp_us: Option<i64>,

    /// Samples removed by window trimming since creation
    pub evicted_count: u64,

    /// Samples that arrived with a timestamp older than their predecessor
    pub out_of_order_count: u64,
}

/// Snapshot of both stream buffers taken under the manager lock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferStats {
    pub density: StreamStats,

    pub position: StreamStats,

    /// Current trim clock (largest timestamp seen when the shared clock is used)
    pub clock_us: Option<i64>,
}

impl BufferStats {
    /// Total retained samples across both streams
    pub fn total_samples(&self) -> usize {
        self.density.depth + self.position.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_result_is_empty() {
        let result = AggregateResult::default();
        assert!(result.is_empty());
        assert_eq!((result.mean, result.min, result.median), (0, 0, 0));
    }

    #[test]
    fn test_result_display() {
        let result = AggregateResult {
            mean: 15,
            min: 10,
            median: 10,
            count: 2,
        };
        assert_eq!(result.to_string(), "mean=15, min=10, median=10 (n=2)");
    }

    #[test]
    fn test_total_samples() {
        let stats = BufferStats {
            density: StreamStats {
                depth: 3,
                ..Default::default()
            },
            position: StreamStats {
                depth: 2,
                ..Default::default()
            },
            clock_us: Some(10),
        };
        assert_eq!(stats.total_samples(), 5);
    }
}
