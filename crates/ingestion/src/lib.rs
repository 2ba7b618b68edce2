//! # Ingestion
//!
//! Simulated sample ingestion for the density rig.
//!
//! Responsibilities:
//! - Generate density and position samples (`SampleSource`)
//! - Feed them into a shared `SensorDataManager` from producer threads
//! - Issue periodic window queries and collect the results
//!
//! ## Usage Example
//!
//! ```ignore
//! use std::sync::atomic::AtomicBool;
//! use density_engine::SensorDataManager;
//! use ingestion::SimulationHarness;
//!
//! let manager = SensorDataManager::new(blueprint.manager.clone());
//! let stop = AtomicBool::new(false);
//!
//! let report = SimulationHarness::new(blueprint.simulation.clone()).run(&manager, &stop)?;
//! println!("{}", report.query_metrics.summary());
//! ```

mod config;
mod harness;
mod source;

// Re-exports
pub use config::{IngestionMetrics, MetricsSnapshot};
pub use harness::{SimulationHarness, SimulationReport};
pub use source::{MockDensitySource, MockPositionSource, SampleSource};
