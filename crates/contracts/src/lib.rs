//! # Contracts
//!
//! Frozen interface contracts shared by every crate of the density rig.
//! Business crates depend on this crate only, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Timestamps are integer microseconds (`i64`) as reported by the producers
//! - Density and position streams carry independent clocks; only their ordering per
//!   stream is assumed (non-decreasing)

mod blueprint;
mod error;
mod manager_config;
mod sample;
mod stats;

pub use blueprint::*;
pub use error::*;
pub use manager_config::*;
pub use sample::*;
pub use stats::*;
