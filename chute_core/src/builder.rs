//! Type-state builder for `DecisionEngine`.
//!
//! Parameters and timestep must be provided before `build()` is available.
//! `try_build()` is always available for dynamic checks.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::config::Parameters;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::engine::DecisionEngine;
use crate::error::{BuildError, Result};
use crate::proximity::MIN_TERMINAL_SPEED_MPS;
use crate::rules::RuleBase;
use crate::severity::SeverityEstimator;
use crate::trend::{TrendAverager, window_capacity};
use crate::trigger::TriggerStateMachine;

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

pub struct EngineBuilder<P, T> {
    params: Option<Parameters>,
    dt: Option<f64>,
    rules: Option<Arc<RuleBase>>,
    _p: PhantomData<P>,
    _t: PhantomData<T>,
}

impl Default for EngineBuilder<Missing, Missing> {
    fn default() -> Self {
        Self {
            params: None,
            dt: None,
            rules: None,
            _p: PhantomData,
            _t: PhantomData,
        }
    }
}

fn invalid(msg: &'static str) -> eyre::Report {
    eyre::Report::new(BuildError::InvalidConfig(msg))
}

/// Check parameters and timestep. Shared by the builder and the runner.
pub fn validate_parameters(params: &Parameters, dt: f64) -> Result<()> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(invalid("timestep must be finite and > 0"));
    }
    let pid = &params.pid;
    if ![pid.kp, pid.ki, pid.kd].iter().all(|g| g.is_finite() && *g >= 0.0) {
        return Err(invalid("PID gains must be finite and >= 0"));
    }
    let t = &params.trigger;
    if !(0.0..=100.0).contains(&t.fire_threshold) {
        return Err(invalid("fire threshold must be in [0, 100]"));
    }
    if !(0.0..=100.0).contains(&t.reset_threshold) {
        return Err(invalid("reset threshold must be in [0, 100]"));
    }
    if t.reset_threshold >= t.fire_threshold {
        return Err(invalid("reset threshold must be < fire threshold"));
    }
    if !t.min_sustained_s.is_finite() || t.min_sustained_s < 0.0 {
        return Err(invalid("min sustained duration must be finite and >= 0"));
    }
    if !params.trend.persistence_s.is_finite() || params.trend.persistence_s < 0.0 {
        return Err(invalid("trend persistence must be finite and >= 0"));
    }
    if !params.terminal_velocity_mps.is_finite() {
        return Err(invalid("terminal velocity must be finite"));
    }
    Ok(())
}

/// Validate and construct the engine. Single source of truth for both
/// `try_build` and `build`.
fn validate_and_build(params: Parameters, dt: f64, rules: Arc<RuleBase>) -> Result<DecisionEngine> {
    validate_parameters(&params, dt)?;

    let mut diagnostics = Diagnostics::default();
    let window = window_capacity(params.trend.persistence_s, dt);
    if window.clamped {
        tracing::warn!(
            persistence_s = params.trend.persistence_s,
            dt,
            "trend window shorter than one sample; using capacity 1"
        );
        diagnostics.push(Diagnostic::DegenerateBufferCapacity {
            persistence_s: params.trend.persistence_s,
            dt,
            capacity: window.capacity,
        });
    }
    if params.terminal_velocity_mps.abs() <= MIN_TERMINAL_SPEED_MPS {
        tracing::warn!(
            terminal_velocity_mps = params.terminal_velocity_mps,
            "terminal velocity too close to zero; proximity will read 0"
        );
    }

    Ok(DecisionEngine {
        params,
        dt,
        rules,
        severity: SeverityEstimator::new(params.pid),
        trend: TrendAverager::new(window.capacity),
        trigger: TriggerStateMachine::new(params.trigger),
        diagnostics,
        steps: Vec::new(),
        prev_risk: 0.0,
        max_risk: None,
        fire_index: None,
    })
}

impl<P, T> EngineBuilder<P, T> {
    /// Fallible build available in any type-state; returns detailed error for missing pieces.
    pub fn try_build(self) -> Result<DecisionEngine> {
        let params = self
            .params
            .ok_or_else(|| eyre::Report::new(BuildError::MissingParameters))?;
        let dt = self
            .dt
            .ok_or_else(|| eyre::Report::new(BuildError::MissingTimestep))?;
        let rules = match self.rules {
            Some(r) => r,
            None => Arc::new(RuleBase::reference()?),
        };
        validate_and_build(params, dt, rules)
    }

    /// Use a custom rule base instead of the reference one.
    pub fn with_rule_base(mut self, rules: Arc<RuleBase>) -> Self {
        self.rules = Some(rules);
        self
    }
}

// Setters that advance type-state
impl<T> EngineBuilder<Missing, T> {
    pub fn with_parameters(self, params: Parameters) -> EngineBuilder<Set, T> {
        EngineBuilder {
            params: Some(params),
            dt: self.dt,
            rules: self.rules,
            _p: PhantomData,
            _t: PhantomData,
        }
    }
}

impl<P> EngineBuilder<P, Missing> {
    pub fn with_timestep(self, dt: f64) -> EngineBuilder<P, Set> {
        EngineBuilder {
            params: self.params,
            dt: Some(dt),
            rules: self.rules,
            _p: PhantomData,
            _t: PhantomData,
        }
    }
}

impl EngineBuilder<Set, Set> {
    /// Validate and build. Only available once parameters and timestep are set.
    pub fn build(self) -> Result<DecisionEngine> {
        self.try_build()
    }
}
