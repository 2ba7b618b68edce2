//! Data manager configuration contracts that can be shared across crates.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default retention window: 5 seconds in microseconds
pub const DEFAULT_WINDOW_US: i64 = 5_000_000;

/// Data manager configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ManagerConfig {
    /// Trailing retention window in microseconds
    #[serde(default = "default_window_us")]
    #[validate(range(min = 1, message = "window_us must be > 0"))]
    pub window_us: i64,

    /// Median algorithm used by `query`
    #[serde(default)]
    pub median: MedianAlgorithm,

    /// Which clock drives window trimming
    #[serde(default)]
    pub trim_policy: TrimPolicy,
}

fn default_window_us() -> i64 {
    DEFAULT_WINDOW_US
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            window_us: DEFAULT_WINDOW_US,
            median: MedianAlgorithm::default(),
            trim_policy: TrimPolicy::default(),
        }
    }
}

/// Median extraction algorithm
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedianAlgorithm {
    /// In-place selection of the middle element, expected O(n)
    #[default]
    PartialSelect,
    /// Full ascending sort, O(n log n)
    FullSort,
    /// Max-heap / min-heap pair, usable incrementally
    TwoHeap,
}

impl MedianAlgorithm {
    /// All supported algorithms, in declaration order
    pub const ALL: [MedianAlgorithm; 3] = [
        MedianAlgorithm::PartialSelect,
        MedianAlgorithm::FullSort,
        MedianAlgorithm::TwoHeap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MedianAlgorithm::PartialSelect => "partial_select",
            MedianAlgorithm::FullSort => "full_sort",
            MedianAlgorithm::TwoHeap => "two_heap",
        }
    }
}

/// Strategy for choosing the "now" that window trimming is measured against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimPolicy {
    /// One monotonic clock advanced by whichever stream reports the largest timestamp
    #[default]
    SharedClock,
    /// The timestamp of the sample currently being inserted
    PerCall,
}

impl TrimPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrimPolicy::SharedClock => "shared_clock",
            TrimPolicy::PerCall => "per_call",
        }
    }
}
