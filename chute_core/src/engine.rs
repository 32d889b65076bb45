//! Per-run decision engine: one `step` per sample.

use std::sync::Arc;

use chute_traits::Sample;

use crate::builder::{EngineBuilder, Missing};
use crate::config::Parameters;
use crate::diagnostics::{Diagnostic, Diagnostics, FlickerReport};
use crate::inference::{Inference, Inputs};
use crate::proximity::proximity_ratio;
use crate::rules::{InputVar, RuleBase};
use crate::severity::SeverityEstimator;
use crate::status::{Decision, RunReport, StepOutput};
use crate::trend::TrendAverager;
use crate::trigger::{TriggerEvent, TriggerStateMachine};

/// Owns the PID, trend and trigger state of a single run.
///
/// Samples must be fed in timestamp order; the engine assumes the uniform
/// `dt` it was built with.
pub struct DecisionEngine {
    pub(crate) params: Parameters,
    pub(crate) dt: f64,
    pub(crate) rules: Arc<RuleBase>,
    pub(crate) severity: SeverityEstimator,
    pub(crate) trend: TrendAverager,
    pub(crate) trigger: TriggerStateMachine,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) steps: Vec<StepOutput>,
    /// Risk of the previous step for flicker detection; 0 after a fallback.
    pub(crate) prev_risk: f64,
    /// (index, time, risk) of the highest risk so far.
    pub(crate) max_risk: Option<(usize, f64, f64)>,
    pub(crate) fire_index: Option<usize>,
}

impl core::fmt::Debug for DecisionEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DecisionEngine")
            .field("dt", &self.dt)
            .field("steps", &self.steps.len())
            .field("phase", &self.trigger.phase())
            .field("prev_risk", &self.prev_risk)
            .finish()
    }
}

impl DecisionEngine {
    /// Start building an engine.
    pub fn builder() -> EngineBuilder<Missing, Missing> {
        EngineBuilder::default()
    }

    /// Process one sample. Recoverable conditions substitute a safe value and
    /// are recorded in `diagnostics()`; this never fails.
    pub fn step(&mut self, sample: &Sample) -> StepOutput {
        let index = self.steps.len();
        let time_s = sample.time_s;

        if !sample.is_finite() {
            tracing::warn!(index, time_s, "malformed sample (non-finite field); risk = 0");
            self.diagnostics
                .push(Diagnostic::MalformedSample { index, time_s });
            let out = StepOutput {
                time_s,
                risk: 0.0,
                severity: self.severity.last_output(),
                pitch_trend: self.trend.current(),
                proximity: 0.0,
                phase: self.trigger.phase(),
            };
            return self.finish_step(index, out, None);
        }

        let severity = self.severity.update(sample.vertical_velocity_mps, self.dt);
        let pitch_trend = self.trend.push(sample.pitch_deg);
        let proximity =
            match proximity_ratio(sample.vertical_velocity_mps, self.params.terminal_velocity_mps) {
                Ok(p) => p,
                Err(e) => {
                    tracing::debug!(time_s, error = %e, "proximity unavailable; using 0");
                    self.diagnostics.push(Diagnostic::DegenerateProximityDivisor {
                        time_s,
                        terminal_velocity_mps: self.params.terminal_velocity_mps,
                    });
                    0.0
                }
            };

        let inputs = Inputs {
            severity,
            pitch_trend,
            proximity,
            acceleration: sample.vertical_accel_mps2,
            altitude: sample.altitude_m,
        };
        let (risk, strengths) = match self.rules.infer(&inputs) {
            Ok(Inference { risk, strengths }) => (risk, strengths),
            Err(e) => {
                tracing::warn!(time_s, severity, pitch_trend, proximity, error = %e, "no rule fired; risk = 0");
                self.diagnostics.push(Diagnostic::NoActiveRule { time_s });
                (0.0, vec![0.0; self.rules.rules().len()])
            }
        };
        tracing::trace!(
            time_s,
            severity,
            pitch_trend,
            proximity,
            accel = sample.vertical_accel_mps2,
            altitude = sample.altitude_m,
            risk,
            "step"
        );

        let out = StepOutput {
            time_s,
            risk,
            severity,
            pitch_trend,
            proximity,
            phase: self.trigger.phase(),
        };
        let flicker_ctx = (inputs, strengths);
        self.finish_step(index, out, Some(flicker_ctx))
    }

    /// Shared tail of `step`: flicker check, trigger update, bookkeeping.
    fn finish_step(
        &mut self,
        index: usize,
        mut out: StepOutput,
        ctx: Option<(Inputs, Vec<f64>)>,
    ) -> StepOutput {
        let cfg = *self.trigger.cfg();
        if self.prev_risk > cfg.fire_threshold && out.risk < cfg.reset_threshold {
            let report = self.flicker_report(&out, ctx);
            tracing::warn!(
                time_s = out.time_s,
                previous_risk = self.prev_risk,
                risk = out.risk,
                pitch_neutral = report.pitch_neutral,
                severity_critical = report.severity_critical,
                proximity_high = report.proximity_high,
                "risk flicker across the hysteresis band"
            );
            self.diagnostics.push(Diagnostic::Flicker(report));
        }
        self.prev_risk = out.risk;

        match self.trigger.update(out.risk, self.dt, out.time_s) {
            TriggerEvent::Armed => {
                tracing::debug!(time_s = out.time_s, risk = out.risk, "deployment timer armed");
            }
            TriggerEvent::Reset => {
                tracing::debug!(time_s = out.time_s, risk = out.risk, "deployment timer reset");
            }
            TriggerEvent::Fired { time_s } => {
                tracing::info!(
                    time_s,
                    risk = out.risk,
                    accumulated_s = self.trigger.state().accumulated_s,
                    "deployment decision fired"
                );
                self.fire_index = Some(index);
            }
            TriggerEvent::Unchanged => {}
        }
        out.phase = self.trigger.phase();

        if self.max_risk.is_none_or(|(_, _, r)| out.risk > r) {
            self.max_risk = Some((index, out.time_s, out.risk));
        }
        self.steps.push(out);
        out
    }

    fn flicker_report(&self, out: &StepOutput, ctx: Option<(Inputs, Vec<f64>)>) -> FlickerReport {
        let degree = |var: InputVar, term: &str, x: f64| {
            self.rules.input(var).degree(term, x).unwrap_or(0.0)
        };
        let (pitch_neutral, severity_critical, proximity_high, strengths) = match ctx {
            Some((inputs, strengths)) => (
                degree(InputVar::PitchTrend, "Neutro", inputs.pitch_trend),
                degree(InputVar::Severity, "Crítico", inputs.severity),
                degree(InputVar::Proximity, "Alta", inputs.proximity),
                strengths,
            ),
            None => (0.0, 0.0, 0.0, vec![0.0; self.rules.rules().len()]),
        };
        FlickerReport {
            time_s: out.time_s,
            previous_risk: self.prev_risk,
            risk: out.risk,
            pitch_neutral,
            severity_critical,
            proximity_high,
            rule_strengths: self
                .rules
                .rules()
                .iter()
                .map(|r| r.label.clone())
                .zip(strengths)
                .collect(),
        }
    }

    /// Decision so far.
    pub fn decision(&self) -> Decision {
        let (max_risk_index, max_risk_time, max_risk) = match self.max_risk {
            Some((i, t, r)) => (Some(i), t, r),
            None => (None, 0.0, 0.0),
        };
        let state = self.trigger.state();
        Decision {
            fired: state.fire_time.is_some(),
            fire_time: state.fire_time,
            fire_index: self.fire_index,
            max_risk,
            max_risk_time,
            max_risk_index,
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn steps(&self) -> &[StepOutput] {
        &self.steps
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn rule_base(&self) -> &Arc<RuleBase> {
        &self.rules
    }

    pub fn trend_capacity(&self) -> usize {
        self.trend.capacity()
    }

    /// Consume the engine into its run report.
    pub fn finish(self) -> RunReport {
        let decision = self.decision();
        RunReport {
            steps: self.steps,
            decision,
            diagnostics: self.diagnostics,
            dt: self.dt,
            trend_capacity: self.trend.capacity(),
        }
    }
}
