//! Human-readable error descriptions, exit codes and structured JSON errors.

use std::fmt;

/// Run completed without a deployment.
pub const EXIT_NO_DEPLOY: i32 = 0;
/// Run completed and the deployment decision fired.
pub const EXIT_DEPLOYED: i32 = 10;
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_INVALID_CONFIG: i32 = 3;
pub const EXIT_INVALID_SAMPLES: i32 = 4;

/// Context attached to loader errors so they can be classified after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInput {
    Config,
    Samples,
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config => f.write_str("invalid configuration"),
            Self::Samples => f.write_str("invalid samples"),
        }
    }
}

/// Underlying causes joined with ": ", without the classification context.
fn causes(err: &eyre::Report) -> String {
    err.chain()
        .map(|e| e.to_string())
        .filter(|m| m != "invalid configuration" && m != "invalid samples")
        .collect::<Vec<_>>()
        .join(": ")
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use chute_core::error::{BuildError, RunError};

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid engine parameters ({msg}).\nLikely causes: Out-of-range values in the TOML or in --fire-threshold/--reset-threshold/--min-sustained-s.\nHow to fix: Keep 0 <= reset < fire <= 100 and durations >= 0, then rerun."
            ),
            BuildError::MissingParameters | BuildError::MissingTimestep => format!(
                "What happened: The decision engine was not fully configured ({be}).\nLikely causes: Internal wiring error.\nHow to fix: Re-run with --log-level=debug and report the output."
            ),
        };
    }

    if let Some(re) = err.downcast_ref::<RunError>() {
        return match re {
            RunError::NonMonotonicTimestamps { index } => format!(
                "What happened: Sample {index} does not come after the previous one.\nLikely causes: Unsorted or duplicated rows.\nHow to fix: Sort the samples by time_s and drop duplicates."
            ),
            RunError::Source(msg) => format!(
                "What happened: The sample source failed ({msg}).\nLikely causes: Truncated input or an I/O error.\nHow to fix: Check the input and rerun."
            ),
            RunError::Actuator(msg) => format!(
                "What happened: The deployment actuator failed ({msg}).\nLikely causes: Release channel fault.\nHow to fix: Check the actuator wiring before the next run."
            ),
        };
    }

    if let Some(kind) = err.downcast_ref::<InvalidInput>() {
        let detail = causes(err);
        return match kind {
            InvalidInput::Config => format!(
                "What happened: Invalid configuration ({detail}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then run `chute --config FILE check`."
            ),
            InvalidInput::Samples => {
                if detail.contains("must have headers") {
                    format!(
                        "Invalid headers in sample CSV. Expected '{}'.",
                        chute_config::SAMPLE_HEADERS.join(",")
                    )
                } else {
                    format!(
                        "What happened: The sample CSV could not be used ({detail}).\nLikely causes: Missing file, non-numeric fields or timestamps out of order.\nHow to fix: Fix the reported row and rerun."
                    )
                }
            }
        };
    }

    // Generic fallback
    let msg = err.to_string();
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes for errors.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    use chute_core::error::{BuildError, RunError};
    if let Some(BuildError::InvalidConfig(_)) = err.downcast_ref::<BuildError>() {
        return EXIT_INVALID_CONFIG;
    }
    if let Some(RunError::NonMonotonicTimestamps { .. }) = err.downcast_ref::<RunError>() {
        return EXIT_INVALID_SAMPLES;
    }
    match err.downcast_ref::<InvalidInput>() {
        Some(InvalidInput::Config) => EXIT_INVALID_CONFIG,
        Some(InvalidInput::Samples) => EXIT_INVALID_SAMPLES,
        None => EXIT_ERROR,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    match exit_code_for_error(err) {
        EXIT_INVALID_CONFIG => "InvalidConfig",
        EXIT_INVALID_SAMPLES => "InvalidSamples",
        _ => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;
    json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}
