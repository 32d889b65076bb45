//! Recoverable-condition records and post-run analysis.
//!
//! Nothing here aborts a run. The engine pushes a `Diagnostic` whenever it
//! substitutes a safe default; `critical_instant` explains the step that
//! decided the run.

use chute_traits::Sample;

use crate::inference::Inputs;
use crate::rules::{InputVar, RuleBase};
use crate::status::RunReport;

/// Terms at or below this degree are left out of the critical-instant report.
pub const ACTIVE_TERM_THRESHOLD: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    NoActiveRule,
    DegenerateProximityDivisor,
    DegenerateBufferCapacity,
    MalformedSample,
    Flicker,
}

impl DiagnosticKind {
    pub const ALL: [Self; 5] = [
        Self::NoActiveRule,
        Self::DegenerateProximityDivisor,
        Self::DegenerateBufferCapacity,
        Self::MalformedSample,
        Self::Flicker,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoActiveRule => "no_active_rule",
            Self::DegenerateProximityDivisor => "degenerate_proximity_divisor",
            Self::DegenerateBufferCapacity => "degenerate_buffer_capacity",
            Self::MalformedSample => "malformed_sample",
            Self::Flicker => "flicker",
        }
    }
}

/// Risk dropped from above the fire threshold to below the reset threshold
/// between two consecutive steps.
#[derive(Debug, Clone, PartialEq)]
pub struct FlickerReport {
    pub time_s: f64,
    pub previous_risk: f64,
    pub risk: f64,
    /// PitchTrend = Neutro
    pub pitch_neutral: f64,
    /// Severity = Crítico
    pub severity_critical: f64,
    /// Proximity = Alta
    pub proximity_high: f64,
    /// (rule label, firing strength)
    pub rule_strengths: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    NoActiveRule {
        time_s: f64,
    },
    DegenerateProximityDivisor {
        time_s: f64,
        terminal_velocity_mps: f64,
    },
    DegenerateBufferCapacity {
        persistence_s: f64,
        dt: f64,
        capacity: usize,
    },
    MalformedSample {
        index: usize,
        time_s: f64,
    },
    Flicker(FlickerReport),
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::NoActiveRule { .. } => DiagnosticKind::NoActiveRule,
            Self::DegenerateProximityDivisor { .. } => DiagnosticKind::DegenerateProximityDivisor,
            Self::DegenerateBufferCapacity { .. } => DiagnosticKind::DegenerateBufferCapacity,
            Self::MalformedSample { .. } => DiagnosticKind::MalformedSample,
            Self::Flicker(_) => DiagnosticKind::Flicker,
        }
    }

    /// Sample time, when the condition belongs to a step.
    pub fn time_s(&self) -> Option<f64> {
        match self {
            Self::NoActiveRule { time_s }
            | Self::DegenerateProximityDivisor { time_s, .. }
            | Self::MalformedSample { time_s, .. } => Some(*time_s),
            Self::Flicker(f) => Some(f.time_s),
            Self::DegenerateBufferCapacity { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn push(&mut self, d: Diagnostic) {
        self.records.push(d);
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.records.iter().filter(|d| d.kind() == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn flickers(&self) -> impl Iterator<Item = &FlickerReport> {
        self.records.iter().filter_map(|d| match d {
            Diagnostic::Flicker(f) => Some(f),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TermDegree {
    pub term: String,
    pub degree: f64,
}

/// A crisp value and the terms it activates.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableReading {
    pub variable: String,
    pub value: f64,
    pub active: Vec<TermDegree>,
}

/// Membership breakdown of the step that decided the run.
#[derive(Debug, Clone, PartialEq)]
pub struct CriticalInstant {
    pub index: usize,
    pub time_s: f64,
    /// True when this is the fire step, false when it is the max-risk step.
    pub fired: bool,
    pub inputs: Vec<VariableReading>,
    pub output: VariableReading,
    pub rule_strengths: Vec<(String, f64)>,
}

fn reading(var: &crate::variable::LinguisticVariable, value: f64) -> VariableReading {
    let active = var
        .terms()
        .iter()
        .zip(var.fuzzify(value))
        .filter(|(_, d)| *d > ACTIVE_TERM_THRESHOLD)
        .map(|(t, degree)| TermDegree {
            term: t.name().to_string(),
            degree,
        })
        .collect();
    VariableReading {
        variable: var.name().to_string(),
        value,
        active,
    }
}

/// Explain the fire step, or the max-risk step when the run did not fire.
///
/// Severity, trend and proximity come from the recorded step output;
/// acceleration and altitude from the raw sample at the same index.
/// Returns `None` for an empty run or when `samples` does not cover the step.
pub fn critical_instant(
    report: &RunReport,
    samples: &[Sample],
    rules: &RuleBase,
) -> Option<CriticalInstant> {
    let index = report.decision.critical_index()?;
    let step = report.steps.get(index)?;
    let sample = samples.get(index)?;
    let inputs = Inputs {
        severity: step.severity,
        pitch_trend: step.pitch_trend,
        proximity: step.proximity,
        acceleration: sample.vertical_accel_mps2,
        altitude: sample.altitude_m,
    };
    let strengths = rules.evaluate(&rules.fuzzify(&inputs));
    Some(CriticalInstant {
        index,
        time_s: step.time_s,
        fired: report.decision.fire_index == Some(index),
        inputs: InputVar::ALL
            .iter()
            .map(|&v| reading(rules.input(v), inputs.value(v)))
            .collect(),
        output: reading(rules.output(), step.risk),
        rule_strengths: rules
            .rules()
            .iter()
            .map(|r| r.label.clone())
            .zip(strengths)
            .collect(),
    })
}
