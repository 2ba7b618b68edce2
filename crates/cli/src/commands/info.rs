//! `info` command implementation.

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::{RigBlueprint, DEFAULT_WINDOW_US};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    manager: ManagerInfo,
    simulation: SimulationInfo,
}

#[derive(Serialize)]
struct ManagerInfo {
    window_us: i64,
    window_secs: f64,
    median: &'static str,
    trim_policy: &'static str,
}

#[derive(Serialize)]
struct SimulationInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    streams: Vec<StreamInfo>,
    query_count: u64,
    query_interval_mm: [i32; 2],
}

#[derive(Serialize)]
struct StreamInfo {
    stream: &'static str,
    samples: u64,
    interval_us: i64,
    duration_us: i64,
    rate_hz: f64,
}

impl StreamInfo {
    fn new(stream: &'static str, samples: u64, interval_us: i64) -> Self {
        Self {
            stream,
            samples,
            interval_us,
            duration_us: (samples as i64).saturating_mul(interval_us),
            rate_hz: if interval_us > 0 {
                1_000_000.0 / interval_us as f64
            } else {
                0.0
            },
        }
    }
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&blueprint);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else if args.effective {
        let toml = ConfigLoader::to_toml(&blueprint).context("Failed to serialize config")?;
        println!("{}", toml);
    } else {
        print_config_info(&blueprint);
    }

    Ok(())
}

fn build_config_info(blueprint: &RigBlueprint) -> ConfigInfo {
    let manager = &blueprint.manager;
    let simulation = &blueprint.simulation;

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        manager: ManagerInfo {
            window_us: manager.window_us,
            window_secs: manager.window_us as f64 / 1_000_000.0,
            median: manager.median.as_str(),
            trim_policy: manager.trim_policy.as_str(),
        },
        simulation: SimulationInfo {
            seed: simulation.seed,
            streams: vec![
                StreamInfo::new(
                    "density",
                    simulation.density.samples,
                    simulation.density.interval_us,
                ),
                StreamInfo::new(
                    "position",
                    simulation.position.samples,
                    simulation.position.interval_us,
                ),
            ],
            query_count: simulation.query.count,
            query_interval_mm: [
                simulation.query.min_position_mm,
                simulation.query.max_position_mm,
            ],
        },
    }
}

fn print_config_info(blueprint: &RigBlueprint) {
    let info = build_config_info(blueprint);

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 Density Rig Configuration                    ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("⚙️  Manager");
    println!("   ├─ Version: {}", info.version);
    if info.manager.window_us == DEFAULT_WINDOW_US {
        println!("   ├─ Window: {:.3}s (default)", info.manager.window_secs);
    } else {
        println!("   ├─ Window: {:.3}s", info.manager.window_secs);
    }
    println!("   ├─ Median: {}", info.manager.median);
    println!("   └─ Trim policy: {}", info.manager.trim_policy);

    println!("\n📡 Streams ({})", info.simulation.streams.len());
    for (i, stream) in info.simulation.streams.iter().enumerate() {
        let prefix = if i == info.simulation.streams.len() - 1 {
            "└─"
        } else {
            "├─"
        };
        println!(
            "   {} {}: {} samples at {:.1} Hz ({:.3}s)",
            prefix,
            stream.stream,
            stream.samples,
            stream.rate_hz,
            stream.duration_us as f64 / 1_000_000.0
        );
    }

    println!("\n🔎 Queries");
    println!("   ├─ Count: {}", info.simulation.query_count);
    println!(
        "   ├─ Interval: [{}, {}] mm",
        info.simulation.query_interval_mm[0], info.simulation.query_interval_mm[1]
    );
    match info.simulation.seed {
        Some(seed) => println!("   └─ Seed: {}", seed),
        None => println!("   └─ Seed: random"),
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_config_info_defaults() {
        let info = build_config_info(&RigBlueprint::default());

        assert_eq!(info.manager.window_us, DEFAULT_WINDOW_US);
        assert!((info.manager.window_secs - 5.0).abs() < 1e-9);
        assert_eq!(info.manager.median, "partial_select");

        let density = &info.simulation.streams[0];
        assert_eq!(density.duration_us, 1_000_000);
        assert!((density.rate_hz - 1000.0).abs() < 1e-9);
        assert_eq!(info.simulation.query_interval_mm, [10, 200]);
    }

    #[test]
    fn test_json_omits_unset_seed() {
        let json = serde_json::to_string(&build_config_info(&RigBlueprint::default())).unwrap();
        assert!(!json.contains("seed"));
        assert!(json.contains("\"trim_policy\":\"shared_clock\""));
    }
}
