//! Thread-safe data manager shared by the producer and query threads.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use contracts::{
    AggregateResult, BufferStats, ManagerConfig, MedianAlgorithm, Sample, StreamKind, TrimPolicy,
};
use observability::{record_buffer_depth, record_query, record_sample_received, record_samples_evicted};
use tracing::{debug, instrument};

use crate::aggregate::aggregate;
use crate::buffer::StreamBuffer;
use crate::interpolate;

/// Both stream buffers plus the trim clock, guarded as one unit
#[derive(Debug)]
struct StreamState {
    density: StreamBuffer,
    position: StreamBuffer,
    /// Largest timestamp seen on either stream
    clock_us: Option<i64>,
}

impl StreamState {
    fn new() -> Self {
        Self {
            density: StreamBuffer::new(StreamKind::Density),
            position: StreamBuffer::new(StreamKind::Position),
            clock_us: None,
        }
    }

    fn buffer_mut(&mut self, kind: StreamKind) -> &mut StreamBuffer {
        match kind {
            StreamKind::Density => &mut self.density,
            StreamKind::Position => &mut self.position,
        }
    }
}

/// Ingests the density and position streams and answers interval queries
///
/// One mutex covers both buffers, so a query always sees a consistent pair of
/// streams and never a partially applied insert.
#[derive(Debug)]
pub struct SensorDataManager {
    config: ManagerConfig,
    state: Mutex<StreamState>,
}

impl Default for SensorDataManager {
    fn default() -> Self {
        Self::new(ManagerConfig::default())
    }
}

impl SensorDataManager {
    /// Create a new manager with the given configuration
    pub fn new(config: ManagerConfig) -> Self {
        Self {
            config,
            state: Mutex::new(StreamState::new()),
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Record a density reading taken at `timestamp_us`
    pub fn record_density(&self, value: i32, timestamp_us: i64) {
        self.record(StreamKind::Density, Sample::new(timestamp_us, value));
    }

    /// Record a board position (mm) observed at `timestamp_us`
    pub fn record_position(&self, value_mm: i32, timestamp_us: i64) {
        self.record(StreamKind::Position, Sample::new(timestamp_us, value_mm));
    }

    /// Mean / min / median density over `[min_position_mm, max_position_mm]`
    /// using the configured median algorithm
    pub fn query(&self, min_position_mm: i32, max_position_mm: i32) -> AggregateResult {
        self.query_with(min_position_mm, max_position_mm, self.config.median)
    }

    /// Same as [`query`](Self::query) with an explicit median algorithm
    #[instrument(
        level = "trace",
        name = "density_query",
        skip(self),
        fields(count = tracing::field::Empty)
    )]
    pub fn query_with(
        &self,
        min_position_mm: i32,
        max_position_mm: i32,
        algorithm: MedianAlgorithm,
    ) -> AggregateResult {
        let started = Instant::now();
        let result = {
            let state = self.lock();
            aggregate(
                &state.density,
                &state.position,
                min_position_mm,
                max_position_mm,
                algorithm,
            )
        };

        tracing::Span::current().record("count", result.count);
        record_query(&result, started.elapsed().as_secs_f64() * 1_000_000.0);
        result
    }

    /// Board position (mm) at `timestamp_us`, `None` if no position is retained
    pub fn interpolate_position(&self, timestamp_us: i64) -> Option<i32> {
        interpolate::interpolate_position(&self.lock().position, timestamp_us)
    }

    /// Snapshot of both buffers
    pub fn buffer_stats(&self) -> BufferStats {
        let state = self.lock();
        BufferStats {
            density: state.density.stats(),
            position: state.position.stats(),
            clock_us: state.clock_us,
        }
    }

    /// Trim both buffers, then append `sample` to its stream
    ///
    /// A sample already older than the cutoff (a stream lagging the shared
    /// clock by more than the window) is counted as evicted and never stored.
    fn record(&self, kind: StreamKind, sample: Sample) {
        let (density_depth, position_depth) = {
            let mut state = self.lock();
            let cutoff_us = self.trim(&mut state, sample.timestamp_us);
            let buffer = state.buffer_mut(kind);
            if sample.timestamp_us < cutoff_us {
                buffer.discard_expired();
                debug!(
                    stream = %kind,
                    timestamp_us = sample.timestamp_us,
                    cutoff_us,
                    "dropped sample older than window"
                );
                record_samples_evicted(kind, 1);
            } else {
                buffer.push(sample);
            }
            (state.density.len(), state.position.len())
        };

        record_sample_received(kind);
        record_buffer_depth(StreamKind::Density, density_depth);
        record_buffer_depth(StreamKind::Position, position_depth);
    }

    /// Evict samples older than the window from both buffers, returning the cutoff
    fn trim(&self, state: &mut StreamState, timestamp_us: i64) -> i64 {
        let now_us = match self.config.trim_policy {
            TrimPolicy::PerCall => timestamp_us,
            TrimPolicy::SharedClock => {
                let clock = state.clock_us.map_or(timestamp_us, |c| c.max(timestamp_us));
                state.clock_us = Some(clock);
                clock
            }
        };
        let cutoff_us = now_us.saturating_sub(self.config.window_us);

        for buffer in [&mut state.density, &mut state.position] {
            let evicted = buffer.evict_before(cutoff_us);
            if evicted > 0 {
                debug!(
                    stream = %buffer.kind(),
                    evicted,
                    cutoff_us,
                    remaining = buffer.len(),
                    "trimmed expired samples"
                );
                record_samples_evicted(buffer.kind(), evicted);
            }
        }
        cutoff_us
    }

    /// The lock is never held across a panic point that could leave the
    /// buffers half-updated, so a poisoned lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, StreamState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
