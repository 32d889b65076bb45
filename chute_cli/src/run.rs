//! Command implementations: config/sample loading, engine runs and output.

use std::path::Path;
use std::sync::Arc;

use chute_core::{
    CriticalInstant, Diagnostic, DiagnosticKind, Parameters, RuleBase, RunReport, Sample,
    StepOutput, critical_instant,
};
use eyre::WrapErr;
use serde_json::json;

use crate::cli::TriggerOverrides;
use crate::error_fmt::{EXIT_DEPLOYED, EXIT_NO_DEPLOY, InvalidInput};

/// Read, parse and validate the config; built-in defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> eyre::Result<chute_config::Config> {
    let Some(path) = path else {
        return Ok(chute_config::Config::default());
    };
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("read config {path:?}"))
        .wrap_err(InvalidInput::Config)?;
    let cfg = chute_config::load_toml(&text)
        .map_err(|e| eyre::eyre!("parse config {path:?}: {e}"))
        .wrap_err(InvalidInput::Config)?;
    cfg.validate().wrap_err(InvalidInput::Config)?;
    Ok(cfg)
}

pub fn load_samples(path: &Path) -> eyre::Result<Vec<Sample>> {
    let rows = chute_config::load_samples_csv(path).wrap_err(InvalidInput::Samples)?;
    Ok(rows.into_iter().map(Sample::from).collect())
}

/// Config parameters with command-line trigger overrides applied.
pub fn parameters(cfg: &chute_config::Config, overrides: &TriggerOverrides) -> Parameters {
    let mut params = Parameters::from(cfg);
    if let Some(x) = overrides.fire_threshold {
        params.trigger.fire_threshold = x;
    }
    if let Some(x) = overrides.reset_threshold {
        params.trigger.reset_threshold = x;
    }
    if let Some(x) = overrides.min_sustained_s {
        params.trigger.min_sustained_s = x;
    }
    params
}

fn scenario_label(cfg: &chute_config::Config) -> String {
    let kind = cfg.scenario.kind.as_str();
    match cfg.scenario.name.as_deref() {
        Some(name) => format!("{name} ({kind})"),
        None => kind.to_string(),
    }
}

fn diagnostic_counts(report: &RunReport) -> serde_json::Map<String, serde_json::Value> {
    DiagnosticKind::ALL
        .iter()
        .map(|k| (k.as_str().to_string(), json!(report.diagnostics.count(*k))))
        .collect()
}

fn step_json(s: &StepOutput) -> serde_json::Value {
    json!({
        "time_s": s.time_s,
        "risk": s.risk,
        "severity": s.severity,
        "pitch_trend": s.pitch_trend,
        "proximity": s.proximity,
        "phase": s.phase.as_str(),
    })
}

fn exit_code(report: &RunReport) -> i32 {
    if report.decision.fired {
        EXIT_DEPLOYED
    } else {
        EXIT_NO_DEPLOY
    }
}

pub fn run_cmd(
    cfg: &chute_config::Config,
    samples_path: &Path,
    overrides: &TriggerOverrides,
    print_steps: bool,
    json_mode: bool,
) -> eyre::Result<i32> {
    let samples = load_samples(samples_path)?;
    let params = parameters(cfg, overrides);
    let rules = Arc::new(RuleBase::reference()?);
    tracing::info!(
        scenario = %scenario_label(cfg),
        samples = samples.len(),
        fire_threshold = params.trigger.fire_threshold,
        reset_threshold = params.trigger.reset_threshold,
        "evaluating samples"
    );
    let report = chute_core::run(&samples, &params, rules)?;
    let d = &report.decision;

    if json_mode {
        if print_steps {
            for s in &report.steps {
                println!("{}", step_json(s));
            }
        }
        println!(
            "{}",
            json!({
                "scenario": scenario_label(cfg),
                "fired": d.fired,
                "fire_time_s": d.fire_time,
                "max_risk": d.max_risk,
                "max_risk_time_s": d.max_risk_time,
                "steps": report.steps.len(),
                "dt_s": report.dt,
                "trend_capacity": report.trend_capacity,
                "diagnostics": diagnostic_counts(&report),
            })
        );
        return Ok(exit_code(&report));
    }

    if print_steps {
        println!(
            "{:>9} {:>7} {:>8} {:>8} {:>6} phase",
            "time_s", "risk", "severity", "trend", "prox"
        );
        for s in &report.steps {
            println!(
                "{:>9.3} {:>7.2} {:>8.2} {:>8.2} {:>6.3} {}",
                s.time_s,
                s.risk,
                s.severity,
                s.pitch_trend,
                s.proximity,
                s.phase.as_str()
            );
        }
    }
    println!("scenario: {}", scenario_label(cfg));
    println!(
        "samples: {}  dt: {:.3} s  trend window: {} samples",
        report.steps.len(),
        report.dt,
        report.trend_capacity
    );
    match d.fire_time {
        Some(t) => println!("decision: DEPLOY at t={t:.3} s"),
        None => println!(
            "decision: no deployment (max risk {:.2} at t={:.3} s)",
            d.max_risk, d.max_risk_time
        ),
    }
    print_diagnostics(&report);
    Ok(exit_code(&report))
}

fn print_diagnostics(report: &RunReport) {
    if report.diagnostics.is_empty() {
        return;
    }
    let summary: Vec<String> = DiagnosticKind::ALL
        .iter()
        .filter_map(|k| match report.diagnostics.count(*k) {
            0 => None,
            n => Some(format!("{}={n}", k.as_str())),
        })
        .collect();
    println!("diagnostics: {}", summary.join(" "));
    for f in report.diagnostics.flickers() {
        println!(
            "  flicker at t={:.3} s: risk {:.2} -> {:.2} (Neutro {:.2}, Crítico {:.2}, Alta {:.2})",
            f.time_s,
            f.previous_risk,
            f.risk,
            f.pitch_neutral,
            f.severity_critical,
            f.proximity_high
        );
    }
    if let Some(Diagnostic::NoActiveRule { time_s }) = report
        .diagnostics
        .records()
        .iter()
        .find(|d| d.kind() == DiagnosticKind::NoActiveRule)
    {
        println!("  first step with no active rule at t={time_s:.3} s (risk taken as 0)");
    }
}

fn critical_json(ci: &CriticalInstant) -> serde_json::Value {
    let reading = |r: &chute_core::diagnostics::VariableReading| {
        json!({
            "variable": r.variable,
            "value": r.value,
            "terms": r.active.iter().map(|t| json!({ "term": t.term, "degree": t.degree })).collect::<Vec<_>>(),
        })
    };
    json!({
        "index": ci.index,
        "time_s": ci.time_s,
        "fired": ci.fired,
        "inputs": ci.inputs.iter().map(reading).collect::<Vec<_>>(),
        "output": reading(&ci.output),
        "rules": ci.rule_strengths.iter().map(|(l, s)| json!({ "rule": l, "strength": s })).collect::<Vec<_>>(),
    })
}

pub fn explain_cmd(
    cfg: &chute_config::Config,
    samples_path: &Path,
    overrides: &TriggerOverrides,
    json_mode: bool,
) -> eyre::Result<i32> {
    let samples = load_samples(samples_path)?;
    let params = parameters(cfg, overrides);
    let rules = Arc::new(RuleBase::reference()?);
    let report = chute_core::run(&samples, &params, Arc::clone(&rules))?;
    let Some(ci) = critical_instant(&report, &samples, &rules) else {
        eyre::bail!("no steps to explain");
    };

    if json_mode {
        println!("{}", critical_json(&ci));
        return Ok(exit_code(&report));
    }

    let label = if ci.fired { "fire step" } else { "max-risk step" };
    println!(
        "critical instant ({label}): t={:.3} s (sample {})",
        ci.time_s, ci.index
    );
    for r in ci.inputs.iter().chain(std::iter::once(&ci.output)) {
        let terms: Vec<String> = r
            .active
            .iter()
            .map(|t| format!("{} {:.1}%", t.term, t.degree * 100.0))
            .collect();
        let terms = if terms.is_empty() {
            "-".to_string()
        } else {
            terms.join(", ")
        };
        println!("  {:<13} {:>9.3}  {}", r.variable, r.value, terms);
    }
    println!("rules:");
    for (label, strength) in &ci.rule_strengths {
        println!("  {strength:.3}  {label}");
    }
    Ok(exit_code(&report))
}

pub fn check_cmd(cfg: &chute_config::Config, json_mode: bool) -> eyre::Result<i32> {
    let params = Parameters::from(cfg);
    // Same checks the engine applies, with a nominal 1 s timestep.
    chute_core::builder::validate_parameters(&params, 1.0)?;
    let rules = RuleBase::reference()?;
    let t = &params.trigger;

    if json_mode {
        println!(
            "{}",
            json!({
                "ok": true,
                "scenario": scenario_label(cfg),
                "terminal_velocity_mps": params.terminal_velocity_mps,
                "pid": { "kp": params.pid.kp, "ki": params.pid.ki, "kd": params.pid.kd },
                "trigger": {
                    "fire_threshold": t.fire_threshold,
                    "reset_threshold": t.reset_threshold,
                    "min_sustained_s": t.min_sustained_s,
                },
                "trend_persistence_s": params.trend.persistence_s,
                "rules": rules.rules().len(),
            })
        );
    } else {
        println!("config ok");
        println!("scenario: {}", scenario_label(cfg));
        println!("terminal velocity: {:.3} m/s", params.terminal_velocity_mps);
        println!(
            "pid: kp={} ki={} kd={}",
            params.pid.kp, params.pid.ki, params.pid.kd
        );
        println!(
            "trigger: fire>{} reset<{} sustained {} s",
            t.fire_threshold, t.reset_threshold, t.min_sustained_s
        );
        println!("trend persistence: {} s", params.trend.persistence_s);
        println!("rules: {}", rules.rules().len());
    }
    Ok(EXIT_NO_DEPLOY)
}
