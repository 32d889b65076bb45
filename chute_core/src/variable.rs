//! Discretized universes and linguistic variables.

use crate::error::FuzzyError;
use crate::membership::MembershipFunction;

/// Upper bound on samples per universe.
pub const MAX_UNIVERSE_POINTS: usize = 1_000_000;

/// Evenly spaced, strictly increasing sample points `start + i * step`.
#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    step: f64,
    points: Vec<f64>,
}

impl Universe {
    /// Points from `start` to `stop` inclusive. `stop` is reached when
    /// `(stop - start) / step` is integral; otherwise the last point is the
    /// nearest multiple.
    pub fn range(start: f64, stop: f64, step: f64) -> Result<Self, FuzzyError> {
        if !(start.is_finite() && stop.is_finite() && step.is_finite()) {
            return Err(FuzzyError::InvalidUniverse("bounds and step must be finite"));
        }
        if step <= 0.0 {
            return Err(FuzzyError::InvalidUniverse("step must be > 0"));
        }
        if stop <= start {
            return Err(FuzzyError::InvalidUniverse("stop must be > start"));
        }
        let intervals = ((stop - start) / step).round();
        if intervals < 1.0 || intervals >= MAX_UNIVERSE_POINTS as f64 {
            return Err(FuzzyError::InvalidUniverse("step does not fit the range"));
        }
        let n = intervals as usize;
        let points = (0..=n).map(|i| start + i as f64 * step).collect();
        Ok(Self { step, points })
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn start(&self) -> f64 {
        self.points.first().copied().unwrap_or(0.0)
    }

    pub fn stop(&self) -> f64 {
        self.points.last().copied().unwrap_or(0.0)
    }

    /// Piecewise-linear interpolation of `curve` (one value per point) at `x`.
    /// Outside the universe the end samples are returned. NaN reads as 0.
    pub fn interpolate(&self, curve: &[f64], x: f64) -> f64 {
        let (Some(&first), Some(&last)) = (curve.first(), curve.last()) else {
            return 0.0;
        };
        if x.is_nan() {
            return 0.0;
        }
        if x <= self.start() {
            return first;
        }
        if x >= self.stop() {
            return last;
        }
        // First point strictly greater than x; in 1..len because of the checks above.
        let hi = self.points.partition_point(|&p| p <= x);
        let lo = hi - 1;
        let (x0, x1) = (self.points[lo], self.points[hi]);
        let (y0, y1) = (curve[lo], curve[hi]);
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}

/// A named term: its shape and the shape sampled over the variable's universe.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    name: String,
    shape: MembershipFunction,
    curve: Vec<f64>,
}

impl Term {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &MembershipFunction {
        &self.shape
    }

    pub fn curve(&self) -> &[f64] {
        &self.curve
    }
}

/// Named universe with an ordered list of terms.
#[derive(Debug, Clone, PartialEq)]
pub struct LinguisticVariable {
    name: String,
    universe: Universe,
    terms: Vec<Term>,
}

impl LinguisticVariable {
    pub fn new(name: impl Into<String>, universe: Universe) -> Self {
        Self {
            name: name.into(),
            universe,
            terms: Vec::new(),
        }
    }

    /// Add a term; names must be unique within the variable.
    pub fn with_term(
        mut self,
        name: impl Into<String>,
        shape: MembershipFunction,
    ) -> Result<Self, FuzzyError> {
        let name = name.into();
        if self.term_index(&name).is_some() {
            return Err(FuzzyError::DuplicateTerm {
                variable: self.name.clone(),
                term: name,
            });
        }
        let curve = shape.sample(&self.universe);
        self.terms.push(Term { name, shape, curve });
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn term(&self, name: &str) -> Option<&Term> {
        self.terms.iter().find(|t| t.name == name)
    }

    pub fn term_index(&self, name: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.name == name)
    }

    /// Degree of `value` in `term`, interpolated over the sampled curve.
    pub fn degree(&self, term: &str, value: f64) -> Result<f64, FuzzyError> {
        let t = self.term(term).ok_or_else(|| FuzzyError::UnknownTerm {
            variable: self.name.clone(),
            term: term.to_string(),
        })?;
        Ok(self.universe.interpolate(&t.curve, value))
    }

    /// Degrees of `value` in every term, in term order.
    pub fn fuzzify(&self, value: f64) -> Vec<f64> {
        self.terms
            .iter()
            .map(|t| self.universe.interpolate(&t.curve, value))
            .collect()
    }
}
