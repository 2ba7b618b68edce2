//! Simulation harness
//!
//! Drives one `SensorDataManager` from three named threads: a density
//! producer, a position producer and a query consumer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, Scope, ScopedJoinHandle};
use std::time::{Duration, Instant};

use contracts::{AggregateResult, BufferStats, ContractError, SimulationConfig, StreamKind};
use density_engine::SensorDataManager;
use observability::QueryMetricsAggregator;
use tracing::{debug, info, instrument, warn};

use crate::config::IngestionMetrics;
use crate::source::{MockDensitySource, MockPositionSource, SampleSource};

/// Upper bound on the up-front allocation for query results
const RESULT_PREALLOC: u64 = 1024;

/// Result of one harness run
#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// Seed the density source was driven with
    pub seed: u64,

    /// Density samples handed to the manager
    pub density_sent: u64,

    /// Position samples handed to the manager
    pub position_sent: u64,

    /// Every query result, in issue order
    pub results: Vec<AggregateResult>,

    /// Aggregated query statistics
    pub query_metrics: QueryMetricsAggregator,

    /// Buffer state after all threads joined
    pub buffer_stats: BufferStats,

    /// Wall-clock duration of the run
    pub elapsed: Duration,

    /// True when the stop flag cut the run short
    pub stopped_early: bool,
}

/// Simulation harness
#[derive(Debug, Clone)]
pub struct SimulationHarness {
    config: SimulationConfig,
    seed: u64,
}

impl SimulationHarness {
    /// Create a harness; a missing seed is drawn at random
    pub fn new(config: SimulationConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self { config, seed }
    }

    /// Seed in use
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Simulation configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run all three threads against `manager` and wait for them
    ///
    /// Producers exit when their source is exhausted, the consumer after
    /// `query.count` queries. Setting `stop` ends every thread at its next
    /// iteration. If a thread cannot be spawned, `stop` is raised so the
    /// threads already running wind down before the error is returned.
    #[instrument(name = "simulation_run", skip_all, fields(seed = self.seed))]
    pub fn run(
        &self,
        manager: &SensorDataManager,
        stop: &AtomicBool,
    ) -> Result<SimulationReport, ContractError> {
        let started = Instant::now();
        let metrics = IngestionMetrics::new();

        info!(
            density_samples = self.config.density.samples,
            position_samples = self.config.position.samples,
            queries = self.config.query.count,
            "simulation starting"
        );

        let (results, query_metrics) = thread::scope(|scope| -> Result<_, ContractError> {
            let density = spawn_producer(
                scope,
                "density-producer",
                Box::new(MockDensitySource::new(
                    self.config.density.clone(),
                    self.seed,
                )),
                manager,
                stop,
                &metrics,
            )
            .inspect_err(|_| stop.store(true, Ordering::SeqCst))?;

            let position = spawn_producer(
                scope,
                "position-producer",
                Box::new(MockPositionSource::new(self.config.position.clone())),
                manager,
                stop,
                &metrics,
            )
            .inspect_err(|_| stop.store(true, Ordering::SeqCst))?;

            let consumer = thread::Builder::new()
                .name("query-consumer".into())
                .spawn_scoped(scope, || self.consume(manager, stop, &metrics))
                .map_err(|e| {
                    stop.store(true, Ordering::SeqCst);
                    ContractError::simulation(format!("failed to spawn query-consumer: {e}"))
                })?;

            join(density, "density-producer")?;
            join(position, "position-producer")?;
            join(consumer, "query-consumer")
        })?;

        let sent = metrics.snapshot();
        let stopped_early = sent.density_sent < self.config.density.samples
            || sent.position_sent < self.config.position.samples
            || (results.len() as u64) < self.config.query.count;

        let report = SimulationReport {
            seed: self.seed,
            density_sent: sent.density_sent,
            position_sent: sent.position_sent,
            results,
            query_metrics,
            buffer_stats: manager.buffer_stats(),
            elapsed: started.elapsed(),
            stopped_early,
        };

        if stopped_early {
            warn!(
                density_sent = report.density_sent,
                position_sent = report.position_sent,
                queries = report.results.len(),
                "simulation stopped early"
            );
        } else {
            info!(
                elapsed_ms = report.elapsed.as_millis() as u64,
                queries = report.results.len(),
                "simulation finished"
            );
        }

        Ok(report)
    }

    fn consume(
        &self,
        manager: &SensorDataManager,
        stop: &AtomicBool,
        metrics: &IngestionMetrics,
    ) -> (Vec<AggregateResult>, QueryMetricsAggregator) {
        let query = &self.config.query;
        let pause = Duration::from_millis(query.pause_ms);
        let mut results = Vec::with_capacity(query.count.min(RESULT_PREALLOC) as usize);
        let mut aggregator = QueryMetricsAggregator::new();

        for _ in 0..query.count {
            if stop.load(Ordering::Relaxed) {
                break;
            }
            let result = manager.query(query.min_position_mm, query.max_position_mm);
            metrics.record_query();
            aggregator.update(&result);
            debug!(%result, "query");
            results.push(result);

            if !pause.is_zero() {
                thread::sleep(pause);
            }
        }

        (results, aggregator)
    }
}

fn spawn_producer<'scope, 'env>(
    scope: &'scope Scope<'scope, 'env>,
    name: &str,
    mut source: Box<dyn SampleSource>,
    manager: &'env SensorDataManager,
    stop: &'env AtomicBool,
    metrics: &'env IngestionMetrics,
) -> Result<ScopedJoinHandle<'scope, u64>, ContractError> {
    thread::Builder::new()
        .name(name.to_string())
        .spawn_scoped(scope, move || produce(source.as_mut(), manager, stop, metrics))
        .map_err(|e| ContractError::simulation(format!("failed to spawn {name}: {e}")))
}

fn produce(
    source: &mut dyn SampleSource,
    manager: &SensorDataManager,
    stop: &AtomicBool,
    metrics: &IngestionMetrics,
) -> u64 {
    let kind = source.kind();
    let pause = source.pause();
    let mut sent = 0u64;

    while !stop.load(Ordering::Relaxed) {
        let Some(sample) = source.next_sample() else {
            break;
        };
        match kind {
            StreamKind::Density => manager.record_density(sample.value, sample.timestamp_us),
            StreamKind::Position => manager.record_position(sample.value, sample.timestamp_us),
        }
        metrics.record_sent(kind);
        sent += 1;

        if !pause.is_zero() {
            thread::sleep(pause);
        }
    }

    debug!(stream = %kind, sent, "producer finished");
    sent
}

fn join<T>(handle: ScopedJoinHandle<'_, T>, name: &str) -> Result<T, ContractError> {
    handle
        .join()
        .map_err(|_| ContractError::simulation(format!("{name} thread panicked")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{
        DensityProducerConfig, ManagerConfig, PositionProducerConfig, QueryConfig,
    };

    fn fast_config() -> SimulationConfig {
        SimulationConfig {
            seed: Some(7),
            density: DensityProducerConfig {
                samples: 500,
                interval_us: 1000,
                pause_us: 0,
                max_value: 200,
            },
            position: PositionProducerConfig {
                samples: 200,
                interval_us: 3000,
                pause_us: 0,
                step_mm: 1,
            },
            query: QueryConfig {
                count: 20,
                pause_ms: 0,
                min_position_mm: 10,
                max_position_mm: 200,
            },
        }
    }

    #[test]
    fn test_run_to_completion() {
        let manager = SensorDataManager::new(ManagerConfig::default());
        let stop = AtomicBool::new(false);
        let harness = SimulationHarness::new(fast_config());

        let report = harness.run(&manager, &stop).unwrap();

        assert_eq!(report.seed, 7);
        assert_eq!(report.density_sent, 500);
        assert_eq!(report.position_sent, 200);
        assert_eq!(report.results.len(), 20);
        assert_eq!(report.query_metrics.total_queries, 20);
        assert!(!report.stopped_early);

        // 5 s window is wider than the whole run, nothing is evicted
        assert_eq!(report.buffer_stats.density.depth, 500);
        assert_eq!(report.buffer_stats.position.depth, 200);

        for result in &report.results {
            if !result.is_empty() {
                assert!(result.min <= result.median);
                assert!(result.min <= result.mean);
                assert!((0..200).contains(&result.median));
            }
        }
    }

    #[test]
    fn test_final_query_sees_full_streams() {
        let manager = SensorDataManager::new(ManagerConfig::default());
        let stop = AtomicBool::new(false);
        SimulationHarness::new(fast_config())
            .run(&manager, &stop)
            .unwrap();

        // positions 0..199 cover 0..597 ms, density 0..499 ms maps to 0..166 mm
        let result = manager.query(10, 200);
        assert!(result.count > 0);
        assert!(result.min <= result.median);
    }

    #[test]
    fn test_stop_flag_set_before_run() {
        let manager = SensorDataManager::new(ManagerConfig::default());
        let stop = AtomicBool::new(true);

        let report = SimulationHarness::new(fast_config())
            .run(&manager, &stop)
            .unwrap();

        assert!(report.stopped_early);
        assert_eq!(report.density_sent, 0);
        assert_eq!(report.position_sent, 0);
        assert!(report.results.is_empty());
        assert_eq!(report.buffer_stats.total_samples(), 0);
    }

    #[test]
    fn test_random_seed_when_unset() {
        let config = SimulationConfig {
            seed: None,
            ..fast_config()
        };
        let harness = SimulationHarness::new(config);
        let manager = SensorDataManager::new(ManagerConfig::default());
        let report = harness.run(&manager, &AtomicBool::new(false)).unwrap();
        assert_eq!(report.seed, harness.seed());
    }
}
