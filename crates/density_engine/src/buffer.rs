//! Per-stream sample buffer with trailing-window eviction.
//!
//! Samples are appended at the tail and trimmed from the head only, so the
//! backing `VecDeque` stays sorted as long as producers respect arrival order.

use std::collections::VecDeque;
use std::fmt;

use contracts::{Sample, StreamKind, StreamStats};
use tracing::trace;

/// Time-ordered buffer for one measurement stream
pub struct StreamBuffer {
    kind: StreamKind,
    samples: VecDeque<Sample>,
    evicted_count: u64,
    out_of_order_count: u64,
    last_timestamp: Option<i64>,
}

impl fmt::Debug for StreamBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamBuffer")
            .field("kind", &self.kind)
            .field("len", &self.samples.len())
            .field("evicted", &self.evicted_count)
            .finish()
    }
}

impl StreamBuffer {
    /// Create an empty buffer for the given stream
    #[inline]
    pub fn new(kind: StreamKind) -> Self {
        Self {
            kind,
            samples: VecDeque::new(),
            evicted_count: 0,
            out_of_order_count: 0,
            last_timestamp: None,
        }
    }

    /// Stream this buffer holds
    #[inline]
    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    /// Append a sample at the tail
    ///
    /// Out-of-order timestamps are accepted and only counted.
    #[inline]
    pub fn push(&mut self, sample: Sample) {
        if let Some(last) = self.last_timestamp {
            if sample.timestamp_us < last {
                self.out_of_order_count += 1;
                trace!(
                    stream = %self.kind,
                    timestamp_us = sample.timestamp_us,
                    last_timestamp_us = last,
                    "out-of-order sample"
                );
            }
        }
        self.last_timestamp = Some(sample.timestamp_us);
        self.samples.push_back(sample);
    }

    /// Pop head samples while their timestamp is strictly older than `cutoff_us`
    ///
    /// Returns the number of evicted samples.
    #[inline]
    pub fn evict_before(&mut self, cutoff_us: i64) -> usize {
        let mut evicted = 0;
        while self
            .samples
            .front()
            .is_some_and(|s| s.timestamp_us < cutoff_us)
        {
            self.samples.pop_front();
            evicted += 1;
        }
        self.evicted_count += evicted as u64;
        evicted
    }

    /// Count a sample that was rejected as already expired
    #[inline]
    pub fn discard_expired(&mut self) {
        self.evicted_count += 1;
    }

    /// Oldest retained sample
    #[inline]
    pub fn front(&self) -> Option<&Sample> {
        self.samples.front()
    }

    /// Newest retained sample
    #[inline]
    pub fn back(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Sample at position `index` (0 = oldest)
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    /// Index of the first sample whose timestamp is `>= timestamp_us`
    ///
    /// Binary search; relies on non-decreasing timestamps.
    #[inline]
    pub fn lower_bound(&self, timestamp_us: i64) -> usize {
        self.samples
            .partition_point(|s| s.timestamp_us < timestamp_us)
    }

    /// Iterate retained samples, oldest first
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.samples.iter()
    }

    /// Get the number of retained samples
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the buffer is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get evicted sample count
    #[inline]
    pub fn evicted_count(&self) -> u64 {
        self.evicted_count
    }

    /// Get out-of-order sample count
    #[inline]
    pub fn out_of_order_count(&self) -> u64 {
        self.out_of_order_count
    }

    /// Diagnostics snapshot
    pub fn stats(&self) -> StreamStats {
        StreamStats {
            depth: self.len(),
            oldest_timestamp_us: self.front().map(|s| s.timestamp_us),
            newest_timestamp_us: self.back().map(|s| s.timestamp_us),
            evicted_count: self.evicted_count,
            out_of_order_count: self.out_of_order_count,
        }
    }
}
