//! Per-step output and end-of-run records.

use crate::diagnostics::Diagnostics;
use crate::trigger::TriggerPhase;

/// What the engine computed for one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutput {
    pub time_s: f64,
    pub risk: f64,
    pub severity: f64,
    pub pitch_trend: f64,
    pub proximity: f64,
    pub phase: TriggerPhase,
}

/// Final deployment decision of a run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Decision {
    pub fired: bool,
    pub fire_time: Option<f64>,
    pub fire_index: Option<usize>,
    /// Highest risk seen (first occurrence on ties); 0 for an empty run.
    pub max_risk: f64,
    pub max_risk_time: f64,
    pub max_risk_index: Option<usize>,
}

impl Decision {
    /// Step the critical-instant report looks at: the fire step, else the max-risk step.
    pub fn critical_index(&self) -> Option<usize> {
        self.fire_index.or(self.max_risk_index)
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub steps: Vec<StepOutput>,
    pub decision: Decision,
    pub diagnostics: Diagnostics,
    pub dt: f64,
    pub trend_capacity: usize,
}
