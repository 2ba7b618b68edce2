//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 配置 -> 管理器端到端测试
//! - 多线程生产者/查询者测试

#[cfg(test)]
mod contract_tests {
    use contracts::{AggregateResult, ConfigVersion, MedianAlgorithm, RigBlueprint, TrimPolicy};

    #[test]
    fn test_blueprint_json_snapshot() {
        let json = serde_json_snapshot(&RigBlueprint::default());
        assert!(json.contains("\"version\":\"V1\""));
        assert!(json.contains("\"window_us\":5000000"));
        assert!(json.contains("\"median\":\"partial_select\""));
        assert!(json.contains("\"trim_policy\":\"shared_clock\""));
    }

    #[test]
    fn test_contract_defaults() {
        let blueprint = RigBlueprint::default();
        assert_eq!(blueprint.version, ConfigVersion::V1);
        assert_eq!(blueprint.manager.median, MedianAlgorithm::PartialSelect);
        assert_eq!(blueprint.manager.trim_policy, TrimPolicy::SharedClock);
        assert!(AggregateResult::default().is_empty());
    }

    fn serde_json_snapshot(blueprint: &RigBlueprint) -> String {
        config_loader::ConfigLoader::to_json(blueprint)
            .unwrap()
            .split_whitespace()
            .collect()
    }
}

#[cfg(test)]
mod scenario_tests {
    use density_engine::{AggregateResult, MedianAlgorithm, SensorDataManager};

    fn scenario_manager() -> SensorDataManager {
        let manager = SensorDataManager::default();
        manager.record_density(10, 0);
        manager.record_density(20, 1000);
        manager.record_density(30, 2000);
        manager.record_position(0, 0);
        manager.record_position(100, 2000);
        manager
    }

    /// density 10@0, 20@1000, 30@2000 映射到 0, 50, 100 mm
    #[test]
    fn test_basic_scenario() {
        let manager = scenario_manager();

        let result = manager.query(0, 50);
        assert_eq!((result.mean, result.min, result.median), (15, 10, 10));
        assert_eq!(result.count, 2);

        for algorithm in MedianAlgorithm::ALL {
            assert_eq!(manager.query_with(0, 50, algorithm), result);
        }
    }

    #[test]
    fn test_empty_manager() {
        let manager = SensorDataManager::default();
        assert_eq!(manager.query(0, 1000), AggregateResult::default());
        assert_eq!(manager.interpolate_position(0), None);
    }

    #[test]
    fn test_expired_sample_never_contributes() {
        let manager = SensorDataManager::default();
        manager.record_position(0, 0);
        manager.record_position(10_000, 10_000_000);
        manager.record_density(1, 0);
        manager.record_density(99, 6_000_000);

        let result = manager.query(i32::MIN, i32::MAX);
        assert_eq!(result.count, 1);
        assert_eq!(result.min, 99);
    }

    #[test]
    fn test_silent_stream_trimmed_by_other_stream() {
        let manager = SensorDataManager::default();
        manager.record_position(0, 0);
        manager.record_position(5, 1_000);

        manager.record_density(10, 4_000_000);
        assert_eq!(manager.buffer_stats().position.depth, 2);

        manager.record_density(10, 5_000_500);
        assert_eq!(manager.buffer_stats().position.depth, 1);

        manager.record_density(10, 7_000_000);
        assert_eq!(manager.buffer_stats().position.depth, 0);
    }

    #[test]
    fn test_query_idempotent() {
        let manager = scenario_manager();
        assert_eq!(manager.query(0, 100), manager.query(0, 100));
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::Write;
    use std::sync::atomic::AtomicBool;

    use config_loader::ConfigLoader;
    use contracts::{ManagerConfig, MedianAlgorithm, TrimPolicy};
    use density_engine::SensorDataManager;
    use ingestion::SimulationHarness;

    const RIG_TOML: &str = r#"
version = "V1"

[manager]
window_us = 200000
median = "two_heap"
trim_policy = "per_call"

[simulation]
seed = 11

[simulation.density]
samples = 800
interval_us = 1000
pause_us = 0
max_value = 50

[simulation.position]
samples = 300
interval_us = 3000
pause_us = 0
step_mm = 2

[simulation.query]
count = 30
pause_ms = 0
min_position_mm = 0
max_position_mm = 1000
"#;

    /// End-to-end test: config file -> SensorDataManager -> SimulationHarness
    #[test]
    fn test_e2e_config_to_report() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(RIG_TOML.as_bytes()).unwrap();

        let blueprint = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(blueprint.manager.median, MedianAlgorithm::TwoHeap);
        assert_eq!(blueprint.manager.trim_policy, TrimPolicy::PerCall);

        let manager = SensorDataManager::new(blueprint.manager.clone());
        let harness = SimulationHarness::new(blueprint.simulation.clone());
        let report = harness.run(&manager, &AtomicBool::new(false)).unwrap();

        assert_eq!(report.seed, 11);
        assert_eq!(report.density_sent, 800);
        assert_eq!(report.position_sent, 300);
        assert_eq!(report.results.len(), 30);
        assert!(!report.stopped_early);

        // 200 ms 窗口: 保留的样本不早于最新时间戳 - 窗口
        let density = report.buffer_stats.density;
        let oldest = density.oldest_timestamp_us.unwrap();
        let newest = density.newest_timestamp_us.unwrap();
        assert!(newest - oldest <= 200_000);
        assert!(density.evicted_count > 0);

        for result in &report.results {
            if !result.is_empty() {
                assert!(result.min <= result.median);
                assert!(result.min <= result.mean);
                assert!(result.median < 50);
            }
        }
    }

    #[test]
    fn test_same_seed_same_final_state() {
        let blueprint = ConfigLoader::load_from_str(RIG_TOML, config_loader::ConfigFormat::Toml)
            .unwrap();

        let config = ManagerConfig {
            trim_policy: TrimPolicy::SharedClock,
            ..blueprint.manager.clone()
        };
        let run = || {
            let manager = SensorDataManager::new(config.clone());
            SimulationHarness::new(blueprint.simulation.clone())
                .run(&manager, &AtomicBool::new(false))
                .unwrap();
            manager.query(0, 1000)
        };

        // shared clock 下最终保留 [max_ts - window, max_ts]，与线程交错无关
        assert_eq!(run(), run());
    }
}

#[cfg(test)]
mod concurrency_tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;

    use density_engine::{ManagerConfig, SensorDataManager, TrimPolicy};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn run_concurrent(config: ManagerConfig) {
        let manager = Arc::new(SensorDataManager::new(config));
        let done = Arc::new(AtomicBool::new(false));

        let density = {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(5);
                for i in 0..20_000i64 {
                    manager.record_density(rng.random_range(0..200), i * 100);
                }
            })
        };

        let position = {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                for i in 0..6_000i64 {
                    manager.record_position(i as i32, i * 300);
                }
            })
        };

        let querier = {
            let manager = Arc::clone(&manager);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut observed = 0u64;
                while !done.load(Ordering::Acquire) {
                    let result = manager.query(10, 4_000);
                    if !result.is_empty() {
                        assert!(result.min <= result.median, "{result}");
                        assert!(result.min <= result.mean, "{result}");
                        observed += 1;
                    }
                    let stats = manager.buffer_stats();
                    assert!(stats.density.depth <= 20_000);
                }
                observed
            })
        };

        density.join().unwrap();
        position.join().unwrap();
        done.store(true, Ordering::Release);
        querier.join().unwrap();

        let stats = manager.buffer_stats();
        assert_eq!(
            stats.density.depth as u64 + stats.density.evicted_count,
            20_000
        );
        assert_eq!(
            stats.position.depth as u64 + stats.position.evicted_count,
            6_000
        );
    }

    #[test]
    fn test_two_producers_one_querier_shared_clock() {
        run_concurrent(ManagerConfig::default());
    }

    #[test]
    fn test_two_producers_one_querier_per_call() {
        run_concurrent(ManagerConfig {
            window_us: 500_000,
            trim_policy: TrimPolicy::PerCall,
            ..Default::default()
        });
    }

    #[test]
    fn test_retention_after_concurrent_inserts() {
        let config = ManagerConfig {
            window_us: 100_000,
            ..Default::default()
        };
        let manager = Arc::new(SensorDataManager::new(config));

        thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..5_000i64 {
                    manager.record_density(1, i * 100);
                }
            });
            scope.spawn(|| {
                for i in 0..2_000i64 {
                    manager.record_position(i as i32, i * 250);
                }
            });
        });

        // shared clock 为两个流最大时间戳
        let stats = manager.buffer_stats();
        let clock = stats.clock_us.unwrap();
        assert_eq!(clock, 499_900);
        let cutoff = clock - 100_000;
        assert!(stats.density.oldest_timestamp_us.unwrap() >= cutoff);
        assert!(stats.position.oldest_timestamp_us.unwrap() >= cutoff);
    }
}
