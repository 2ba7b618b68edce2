//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::{MedianAlgorithm, TrimPolicy};
use std::path::PathBuf;

/// Density Rig - windowed density statistics over a moving sheet
#[derive(Parser, Debug)]
#[command(
    name = "density-rig",
    author,
    version,
    about = "Density/position stream simulation and windowed statistics",
    long_about = "Feeds simulated density and position streams into a sliding-window data \n\
                  manager from concurrent producer threads, queries mean/min/median density \n\
                  over a position interval, and reports the results."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "DENSITY_RIG_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "DENSITY_RIG_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the producer/consumer simulation
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON); built-in defaults when absent
    #[arg(short, long, env = "DENSITY_RIG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the retention window (microseconds)
    #[arg(long, env = "DENSITY_RIG_WINDOW_US")]
    pub window_us: Option<i64>,

    /// Override the median algorithm
    #[arg(long, value_enum, env = "DENSITY_RIG_MEDIAN")]
    pub median: Option<MedianArg>,

    /// Override the trim policy
    #[arg(long, value_enum, env = "DENSITY_RIG_TRIM_POLICY")]
    pub trim_policy: Option<TrimPolicyArg>,

    /// Override the random seed of the density producer
    #[arg(long, env = "DENSITY_RIG_SEED")]
    pub seed: Option<u64>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "DENSITY_RIG_METRICS_PORT")]
    pub metrics_port: u16,

    /// Print every query result, not only the summary
    #[arg(long)]
    pub show_results: bool,

    /// Validate configuration and exit without running the simulation
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "density-rig.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "density-rig.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the effective configuration as TOML (defaults filled in)
    #[arg(long, conflicts_with = "json")]
    pub effective: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}

/// Median algorithm selectable from the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MedianArg {
    PartialSelect,
    FullSort,
    TwoHeap,
}

impl From<MedianArg> for MedianAlgorithm {
    fn from(arg: MedianArg) -> Self {
        match arg {
            MedianArg::PartialSelect => MedianAlgorithm::PartialSelect,
            MedianArg::FullSort => MedianAlgorithm::FullSort,
            MedianArg::TwoHeap => MedianAlgorithm::TwoHeap,
        }
    }
}

/// Trim policy selectable from the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrimPolicyArg {
    SharedClock,
    PerCall,
}

impl From<TrimPolicyArg> for TrimPolicy {
    fn from(arg: TrimPolicyArg) -> Self {
        match arg {
            TrimPolicyArg::SharedClock => TrimPolicy::SharedClock,
            TrimPolicyArg::PerCall => TrimPolicy::PerCall,
        }
    }
}
