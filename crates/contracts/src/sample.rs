//! Sample - Ingestion input
//!
//! Timestamped measurement shared by the density and position streams.

use serde::{Deserialize, Serialize};

/// Which measurement stream a sample belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    /// Material density readings
    Density,
    /// Board position readings (millimetres)
    Position,
}

impl StreamKind {
    /// Stable lowercase label, used for metric labels and log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Density => "density",
            StreamKind::Position => "position",
        }
    }
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single timestamped reading.
///
/// Density and position samples share this shape but live in separate buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Producer timestamp in microseconds
    pub timestamp_us: i64,

    /// Reading value (density units or millimetres)
    pub value: i32,
}

impl Sample {
    pub fn new(timestamp_us: i64, value: i32) -> Self {
        Self {
            timestamp_us,
            value,
        }
    }
}
