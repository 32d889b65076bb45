//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "chute", version, about = "Fall-risk assessment and parachute trigger")]
pub struct Cli {
    /// Path to config TOML (typed); built-in defaults when omitted
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print results and errors as JSON lines
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG takes precedence
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Trigger knobs that override the `[trigger]` section for one run.
#[derive(clap::Args, Debug, Clone, Copy, Default)]
pub struct TriggerOverrides {
    /// Risk above which the deployment timer runs
    #[arg(long, value_name = "RISK")]
    pub fire_threshold: Option<f64>,
    /// Risk below which the deployment timer resets
    #[arg(long, value_name = "RISK")]
    pub reset_threshold: Option<f64>,
    /// Seconds of sustained risk before deployment
    #[arg(long = "min-sustained-s", value_name = "SECONDS")]
    pub min_sustained_s: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the decision engine over a sample CSV and print the decision
    Run {
        /// Sample CSV (strict header)
        #[arg(long, value_name = "FILE")]
        samples: PathBuf,
        #[command(flatten)]
        overrides: TriggerOverrides,
        /// Also print every step
        #[arg(long, action = ArgAction::SetTrue)]
        steps: bool,
    },
    /// Show term memberships at the fire step (or the max-risk step)
    Explain {
        /// Sample CSV (strict header)
        #[arg(long, value_name = "FILE")]
        samples: PathBuf,
        #[command(flatten)]
        overrides: TriggerOverrides,
    },
    /// Validate the config and print derived values
    Check,
}
