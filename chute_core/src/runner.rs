//! Sequential run orchestration over a sample slice or a `SampleSource`.

use std::sync::Arc;

use chute_traits::{DeploymentActuator, Sample, SampleSource};

use crate::config::Parameters;
use crate::engine::DecisionEngine;
use crate::error::{Result, RunError};
use crate::rules::RuleBase;
use crate::status::RunReport;
use crate::trigger::TriggerPhase;
use crate::util::{derive_dt, first_non_increasing};

fn build_engine(params: &Parameters, dt: f64, rules: Arc<RuleBase>) -> Result<DecisionEngine> {
    DecisionEngine::builder()
        .with_parameters(*params)
        .with_timestep(dt)
        .with_rule_base(rules)
        .build()
}

/// Fold every sample through a fresh engine.
///
/// The timestep is derived from the first two samples. Non-increasing
/// timestamps are rejected before any step runs.
pub fn run(samples: &[Sample], params: &Parameters, rules: Arc<RuleBase>) -> Result<RunReport> {
    if let Some(index) = first_non_increasing(samples) {
        return Err(eyre::Report::new(RunError::NonMonotonicTimestamps { index }));
    }
    let dt = derive_dt(samples);
    let mut engine = build_engine(params, dt, rules)?;
    tracing::info!(samples = samples.len(), dt, "run start");
    for s in samples {
        engine.step(s);
    }
    let report = engine.finish();
    log_end(&report);
    Ok(report)
}

fn next_sample<S: SampleSource + ?Sized>(source: &mut S) -> Result<Option<Sample>> {
    source
        .next_sample()
        .map_err(|e| eyre::Report::new(RunError::Source(e.to_string())))
}

/// Pull samples until the source is exhausted, calling `actuator.deploy`
/// exactly once on the step that fires.
///
/// The first two samples are buffered to derive the timestep.
pub fn run_source<S, A>(
    source: &mut S,
    actuator: &mut A,
    params: &Parameters,
    rules: Arc<RuleBase>,
) -> Result<RunReport>
where
    S: SampleSource + ?Sized,
    A: DeploymentActuator + ?Sized,
{
    let mut head = Vec::with_capacity(2);
    while head.len() < 2 {
        match next_sample(source)? {
            Some(s) => head.push(s),
            None => break,
        }
    }
    let dt = derive_dt(&head);
    let mut engine = build_engine(params, dt, rules)?;
    tracing::info!(dt, mode = "source", "run start");

    let mut prev_time: Option<f64> = None;
    let mut index = 0usize;
    let mut pending = head.into_iter();
    loop {
        let sample = match pending.next() {
            Some(s) => s,
            None => match next_sample(source)? {
                Some(s) => s,
                None => break,
            },
        };
        if let Some(p) = prev_time
            && !(sample.time_s > p)
        {
            return Err(eyre::Report::new(RunError::NonMonotonicTimestamps { index }));
        }
        prev_time = Some(sample.time_s);

        let already_fired = engine.decision().fired;
        let out = engine.step(&sample);
        if !already_fired && out.phase == TriggerPhase::Fired {
            actuator
                .deploy(out.time_s)
                .map_err(|e| eyre::Report::new(RunError::Actuator(e.to_string())))?;
            tracing::info!(time_s = out.time_s, "deployment actuated");
        }
        index += 1;
    }

    let report = engine.finish();
    log_end(&report);
    Ok(report)
}

fn log_end(report: &RunReport) {
    let d = &report.decision;
    if d.fired {
        tracing::info!(fire_time = d.fire_time, steps = report.steps.len(), "run complete: deploy");
    } else {
        tracing::info!(
            max_risk = d.max_risk,
            max_risk_time = d.max_risk_time,
            steps = report.steps.len(),
            "run complete: no deployment"
        );
    }
}
