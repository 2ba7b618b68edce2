//! Timestamp to board position interpolation.

use crate::buffer::StreamBuffer;

/// Estimate the board position (mm) at `timestamp_us`
///
/// Piecewise-linear between the two retained position samples bracketing the
/// timestamp, clamped to the first/last sample outside the retained range.
/// Returns `None` when no position is known.
pub fn interpolate_position(positions: &StreamBuffer, timestamp_us: i64) -> Option<i32> {
    let first = positions.front()?;
    let last = positions.back()?;

    if timestamp_us <= first.timestamp_us {
        return Some(first.value);
    }
    if timestamp_us >= last.timestamp_us {
        return Some(last.value);
    }

    // first.timestamp < t < last.timestamp implies len >= 2; the clamp only
    // matters when out-of-order input breaks the binary search
    let idx = positions
        .lower_bound(timestamp_us)
        .clamp(1, positions.len() - 1);
    let after = positions.get(idx)?;
    let before = positions.get(idx - 1)?;

    let span = after.timestamp_us - before.timestamp_us;
    if span <= 0 {
        // duplicate or out-of-order timestamps
        return Some(after.value);
    }

    let ratio = (timestamp_us - before.timestamp_us) as f64 / span as f64;
    let delta = f64::from(after.value) - f64::from(before.value);
    Some((f64::from(before.value) + ratio * delta) as i32)
}
