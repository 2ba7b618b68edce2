//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::RigBlueprint;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    window_us: i64,
    median: &'static str,
    trim_policy: &'static str,
    density_samples: u64,
    position_samples: u64,
    query_count: u64,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    window_us: blueprint.manager.window_us,
                    median: blueprint.manager.median.as_str(),
                    trim_policy: blueprint.manager.trim_policy.as_str(),
                    density_samples: blueprint.simulation.density.samples,
                    position_samples: blueprint.simulation.position.samples,
                    query_count: blueprint.simulation.query.count,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &RigBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();
    let simulation = &blueprint.simulation;

    if simulation.query.count == 0 {
        warnings.push("simulation.query.count is 0 - no queries will be issued".to_string());
    }

    if simulation.density.samples == 0 {
        warnings.push("simulation.density.samples is 0 - every query will be empty".to_string());
    }

    if simulation.position.samples < 2 {
        warnings.push(
            "simulation.position has fewer than 2 samples - interpolation will be flat"
                .to_string(),
        );
    }

    // 密度流时长超过窗口时，早期样本会被裁剪
    let density_span =
        (simulation.density.samples as i64).saturating_mul(simulation.density.interval_us);
    if density_span > blueprint.manager.window_us {
        warnings.push(format!(
            "density stream spans {} us, longer than window_us {} - older samples will be evicted",
            density_span, blueprint.manager.window_us
        ));
    }

    if simulation.seed.is_none() {
        warnings.push("simulation.seed is unset - runs will not be reproducible".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Window: {} us", summary.window_us);
            println!("  Median: {}", summary.median);
            println!("  Trim policy: {}", summary.trim_policy);
            println!("  Density samples: {}", summary.density_samples);
            println!("  Position samples: {}", summary.position_samples);
            println!("  Queries: {}", summary.query_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
