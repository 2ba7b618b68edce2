//! Median strategies.
//!
//! Every algorithm returns the lower-middle element for even-length input
//! (index `(n - 1) / 2` of the ascending order), never an average.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use contracts::MedianAlgorithm;

/// Compute the median of `values` with the given algorithm
///
/// `values` may be reordered. Empty input yields 0.
pub fn compute(algorithm: MedianAlgorithm, values: &mut [i32]) -> i32 {
    if values.is_empty() {
        return 0;
    }

    match algorithm {
        MedianAlgorithm::PartialSelect => partial_select(values),
        MedianAlgorithm::FullSort => full_sort(values),
        MedianAlgorithm::TwoHeap => two_heap(values),
    }
}

#[inline]
fn lower_middle(len: usize) -> usize {
    (len - 1) / 2
}

/// Place the lower-middle element in sorted position without a full sort
fn partial_select(values: &mut [i32]) -> i32 {
    let mid = lower_middle(values.len());
    let (_, median, _) = values.select_nth_unstable(mid);
    *median
}

/// Sort ascending; leaves `values` fully ordered
fn full_sort(values: &mut [i32]) -> i32 {
    values.sort_unstable();
    values[lower_middle(values.len())]
}

/// Single pass through a [`StreamingMedian`]
fn two_heap(values: &[i32]) -> i32 {
    let mut running = StreamingMedian::with_capacity(values.len());
    for &value in values {
        running.push(value);
    }
    running.median().unwrap_or(0)
}

/// Online median over a growing sequence
///
/// `lower` is a max-heap holding the smaller half, `upper` a min-heap holding
/// the larger half. After every push `lower.len()` is `upper.len()` or
/// `upper.len() + 1`, so the lower-middle element is always `lower`'s top.
#[derive(Debug, Clone, Default)]
pub struct StreamingMedian {
    lower: BinaryHeap<i32>,
    upper: BinaryHeap<Reverse<i32>>,
}

impl StreamingMedian {
    /// Empty median tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty tracker with room for `capacity` values split across both heaps
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lower: BinaryHeap::with_capacity(capacity / 2 + 1),
            upper: BinaryHeap::with_capacity(capacity / 2 + 1),
        }
    }

    /// Insert one value and rebalance
    pub fn push(&mut self, value: i32) {
        match self.lower.peek() {
            Some(&top) if value >= top => self.upper.push(Reverse(value)),
            _ => self.lower.push(value),
        }

        if self.lower.len() > self.upper.len() + 1 {
            if let Some(top) = self.lower.pop() {
                self.upper.push(Reverse(top));
            }
        } else if self.upper.len() > self.lower.len() {
            if let Some(Reverse(top)) = self.upper.pop() {
                self.lower.push(top);
            }
        }
    }

    /// Current lower-middle median, `None` before the first push
    pub fn median(&self) -> Option<i32> {
        self.lower.peek().copied()
    }

    /// Number of values pushed so far
    pub fn len(&self) -> usize {
        self.lower.len() + self.upper.len()
    }

    /// True before the first push
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }
}
