#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Fall-risk decision engine (sensor-agnostic).
//!
//! Samples come in through `chute_traits::SampleSource`; a fire decision goes
//! out through `chute_traits::DeploymentActuator`. Everything in between is
//! a deterministic sequential fold.
//!
//! ## Architecture
//!
//! - **Severity**: setpoint-zero PID over vertical velocity (`severity`)
//! - **Trend**: moving average of pitch over a persistence window (`trend`)
//! - **Proximity**: vertical speed as a fraction of terminal velocity (`proximity`)
//! - **Inference**: Mamdani min/max over triangular terms, centroid output
//!   (`membership`, `variable`, `rules`, `inference`)
//! - **Trigger**: hysteresis with a sustained-duration debounce (`trigger`)
//! - **Engine**: per-run state, one `step` per sample (`engine`, `builder`)
//! - **Diagnostics**: recoverable conditions and critical-instant analysis

pub mod builder;
pub mod config;
pub mod conversions;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod inference;
pub mod membership;
pub mod proximity;
pub mod rules;
pub mod runner;
pub mod severity;
pub mod status;
pub mod trend;
pub mod trigger;
pub mod util;
pub mod variable;

pub use builder::{EngineBuilder, Missing, Set};
pub use config::{Parameters, PidGains, TrendCfg, TriggerCfg};
pub use diagnostics::{CriticalInstant, Diagnostic, DiagnosticKind, Diagnostics, critical_instant};
pub use engine::DecisionEngine;
pub use error::{BuildError, FuzzyError, ProximityError, Result, RunError};
pub use inference::{Inference, Inputs};
pub use membership::MembershipFunction;
pub use rules::{InputVar, Rule, RuleBase, RuleExpr};
pub use runner::{run, run_source};
pub use status::{Decision, RunReport, StepOutput};
pub use trigger::{TriggerPhase, TriggerState};
pub use variable::{LinguisticVariable, Universe};

pub use chute_traits::Sample;
