//! `run` command implementation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::RigBlueprint;
use density_engine::SensorDataManager;
use ingestion::SimulationHarness;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::report;

/// Execute the `run` command
pub async fn run_simulation(args: &RunArgs) -> Result<()> {
    let mut blueprint = load_blueprint(args)?;

    apply_overrides(&mut blueprint, args);
    ConfigLoader::validate(&blueprint).context("Invalid configuration after CLI overrides")?;

    info!(
        window_us = blueprint.manager.window_us,
        median = blueprint.manager.median.as_str(),
        trim_policy = blueprint.manager.trim_policy.as_str(),
        density_samples = blueprint.simulation.density.samples,
        position_samples = blueprint.simulation.position.samples,
        queries = blueprint.simulation.query.count,
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let manager = Arc::new(SensorDataManager::new(blueprint.manager.clone()));
    let stop = Arc::new(AtomicBool::new(false));
    let harness = SimulationHarness::new(blueprint.simulation.clone());

    info!(seed = harness.seed(), "Starting simulation...");

    let mut task = tokio::task::spawn_blocking({
        let manager = Arc::clone(&manager);
        let stop = Arc::clone(&stop);
        move || harness.run(&manager, &stop)
    });

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let joined = tokio::select! {
        joined = &mut task => joined,
        _ = &mut shutdown => {
            warn!("Received shutdown signal, stopping simulation...");
            stop.store(true, Ordering::SeqCst);
            task.await
        }
    };

    let report = joined
        .context("Simulation task panicked")?
        .context("Simulation failed")?;

    info!(
        density_sent = report.density_sent,
        position_sent = report.position_sent,
        queries = report.results.len(),
        duration_secs = report.elapsed.as_secs_f64(),
        stopped_early = report.stopped_early,
        "Simulation completed"
    );

    report::print_summary(&report, args.show_results);

    info!("Density Rig finished");
    Ok(())
}

fn load_blueprint(args: &RunArgs) -> Result<RigBlueprint> {
    match args.config {
        Some(ref path) => {
            info!(config = %path.display(), "Loading configuration");
            if !path.exists() {
                anyhow::bail!("Configuration file not found: {}", path.display());
            }
            ConfigLoader::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => {
            info!("No configuration file given, using built-in defaults");
            Ok(RigBlueprint::default())
        }
    }
}

/// Apply CLI / environment overrides on top of the file configuration
fn apply_overrides(blueprint: &mut RigBlueprint, args: &RunArgs) {
    if let Some(window_us) = args.window_us {
        info!(window_us, "Overriding window from CLI");
        blueprint.manager.window_us = window_us;
    }
    if let Some(median) = args.median {
        blueprint.manager.median = median.into();
        info!(median = blueprint.manager.median.as_str(), "Overriding median algorithm from CLI");
    }
    if let Some(trim_policy) = args.trim_policy {
        blueprint.manager.trim_policy = trim_policy.into();
        info!(
            trim_policy = blueprint.manager.trim_policy.as_str(),
            "Overriding trim policy from CLI"
        );
    }
    if let Some(seed) = args.seed {
        info!(seed, "Overriding seed from CLI");
        blueprint.simulation.seed = Some(seed);
    }
}

/// Wait for Ctrl+C or SIGTERM
///
/// A handler that cannot be installed never resolves.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &RigBlueprint) {
    let manager = &blueprint.manager;
    let simulation = &blueprint.simulation;

    println!("\n=== Configuration Summary ===\n");
    println!("Manager:");
    println!("  Window: {} us", manager.window_us);
    println!("  Median: {}", manager.median.as_str());
    println!("  Trim policy: {}", manager.trim_policy.as_str());

    println!("\nSimulation:");
    match simulation.seed {
        Some(seed) => println!("  Seed: {}", seed),
        None => println!("  Seed: random"),
    }
    println!(
        "  Density: {} samples every {} us, values in [0, {})",
        simulation.density.samples, simulation.density.interval_us, simulation.density.max_value
    );
    println!(
        "  Position: {} samples every {} us, {} mm per step",
        simulation.position.samples, simulation.position.interval_us, simulation.position.step_mm
    );
    println!(
        "  Queries: {} over [{}, {}] mm, every {} ms",
        simulation.query.count,
        simulation.query.min_position_mm,
        simulation.query.max_position_mm,
        simulation.query.pause_ms
    );

    println!();
}
