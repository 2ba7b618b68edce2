//! Density statistics over a position interval.

use contracts::{AggregateResult, MedianAlgorithm};

use crate::buffer::StreamBuffer;
use crate::interpolate::interpolate_position;
use crate::median;

/// Scan `density` and aggregate every sample whose interpolated position lies in
/// `[min_position_mm, max_position_mm]`
///
/// Samples whose position is unknown never qualify. The caller holds whatever
/// lock protects the two buffers.
pub fn aggregate(
    density: &StreamBuffer,
    position: &StreamBuffer,
    min_position_mm: i32,
    max_position_mm: i32,
    algorithm: MedianAlgorithm,
) -> AggregateResult {
    let mut working_set = Vec::new();
    let mut sum: i64 = 0;
    let mut min = i32::MAX;

    for sample in density.iter() {
        let Some(pos) = interpolate_position(position, sample.timestamp_us) else {
            continue;
        };
        if pos < min_position_mm || pos > max_position_mm {
            continue;
        }

        working_set.push(sample.value);
        sum += i64::from(sample.value);
        min = min.min(sample.value);
    }

    if working_set.is_empty() {
        return AggregateResult::default();
    }

    let count = working_set.len();
    // mean of i32 values always fits in i32
    let mean = (sum / count as i64) as i32;
    let median = median::compute(algorithm, &mut working_set);

    AggregateResult {
        mean,
        min,
        median,
        count,
    }
}
