//! Mamdani inference over a `RuleBase`: fuzzify, fire, clip, aggregate, centroid.

use crate::error::FuzzyError;
use crate::rules::{InputVar, RuleBase};
use crate::variable::Universe;

/// Crisp inputs for one inference step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Inputs {
    pub severity: f64,
    pub pitch_trend: f64,
    pub proximity: f64,
    pub acceleration: f64,
    pub altitude: f64,
}

impl Inputs {
    pub fn value(&self, var: InputVar) -> f64 {
        match var {
            InputVar::Severity => self.severity,
            InputVar::PitchTrend => self.pitch_trend,
            InputVar::Proximity => self.proximity,
            InputVar::Acceleration => self.acceleration,
            InputVar::Altitude => self.altitude,
        }
    }
}

/// Membership degrees of every input in every term, in term order.
#[derive(Debug, Clone)]
pub struct Fuzzified<'a> {
    rules: &'a RuleBase,
    degrees: [Vec<f64>; 5],
}

impl Fuzzified<'_> {
    /// Degree of `var` in `term`; 0 for a term the variable does not have.
    pub fn degree(&self, var: InputVar, term: &str) -> f64 {
        self.rules
            .input(var)
            .term_index(term)
            .and_then(|i| self.degrees[slot(var)].get(i).copied())
            .unwrap_or(0.0)
    }

    pub fn degrees(&self, var: InputVar) -> &[f64] {
        &self.degrees[slot(var)]
    }
}

fn slot(var: InputVar) -> usize {
    match var {
        InputVar::Severity => 0,
        InputVar::PitchTrend => 1,
        InputVar::Proximity => 2,
        InputVar::Acceleration => 3,
        InputVar::Altitude => 4,
    }
}

/// Result of a successful inference.
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    /// Defuzzified risk in the Risk universe.
    pub risk: f64,
    /// Firing strength per rule, in rule order.
    pub strengths: Vec<f64>,
}

impl RuleBase {
    pub fn fuzzify(&self, inputs: &Inputs) -> Fuzzified<'_> {
        let degrees = InputVar::ALL.map(|var| self.input(var).fuzzify(inputs.value(var)));
        Fuzzified {
            rules: self,
            degrees,
        }
    }

    /// Firing strength of every rule, in rule order.
    pub fn evaluate(&self, fuzzified: &Fuzzified<'_>) -> Vec<f64> {
        let leaf = |var: InputVar, term: &str| fuzzified.degree(var, term);
        self.rules()
            .iter()
            .map(|r| r.antecedent.eval(&leaf))
            .collect()
    }

    /// Pointwise max of each consequent curve clipped at its rule's strength.
    pub fn aggregate(&self, strengths: &[f64]) -> Vec<f64> {
        let terms = self.output().terms();
        let mut out = vec![0.0_f64; self.output().universe().len()];
        for (&s, &idx) in strengths.iter().zip(self.consequent_indices()) {
            if s <= 0.0 {
                continue;
            }
            for (o, &mu) in out.iter_mut().zip(terms[idx].curve()) {
                *o = o.max(mu.min(s));
            }
        }
        out
    }

    /// Full pipeline. `NoActiveRule` when the aggregated membership is zero,
    /// which means every rule strength was zero.
    pub fn infer(&self, inputs: &Inputs) -> Result<Inference, FuzzyError> {
        let fuzzified = self.fuzzify(inputs);
        let strengths = self.evaluate(&fuzzified);
        let aggregated = self.aggregate(&strengths);
        let risk = centroid(self.output().universe(), &aggregated).ok_or(FuzzyError::NoActiveRule)?;
        Ok(Inference { risk, strengths })
    }
}

/// Discrete centroid `sum(u * mu) / sum(mu)`; `None` when `sum(mu)` is zero.
pub fn centroid(universe: &Universe, mu: &[f64]) -> Option<f64> {
    let (num, den) = universe
        .points()
        .iter()
        .zip(mu)
        .fold((0.0_f64, 0.0_f64), |(n, d), (&u, &m)| (n + u * m, d + m));
    if den > 0.0 && den.is_finite() {
        Some(num / den)
    } else {
        None
    }
}
