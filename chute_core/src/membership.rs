//! Triangular membership functions.

use crate::error::FuzzyError;
use crate::variable::Universe;

/// Triangle `(left, peak, right)` with `left <= peak <= right`.
///
/// Shoulders are allowed: `left == peak` gives a left shoulder (degree 1 at
/// the left edge), `peak == right` a right shoulder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MembershipFunction {
    left: f64,
    peak: f64,
    right: f64,
}

impl MembershipFunction {
    pub fn triangular(left: f64, peak: f64, right: f64) -> Result<Self, FuzzyError> {
        let finite = left.is_finite() && peak.is_finite() && right.is_finite();
        if !finite || left > peak || peak > right {
            return Err(FuzzyError::InvalidMembershipFunction { left, peak, right });
        }
        Ok(Self { left, peak, right })
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn peak(&self) -> f64 {
        self.peak
    }

    pub fn right(&self) -> f64 {
        self.right
    }

    /// Degree of membership of `x`, always in [0, 1].
    ///
    /// Exactly 1 at the peak, linear on the open ramps and 0 elsewhere
    /// (including `left`/`right` themselves unless they coincide with the peak).
    pub fn degree(&self, x: f64) -> f64 {
        if x == self.peak {
            1.0
        } else if self.left < x && x < self.peak {
            (x - self.left) / (self.peak - self.left)
        } else if self.peak < x && x < self.right {
            (self.right - x) / (self.right - self.peak)
        } else {
            0.0
        }
    }

    /// Sample the shape at every point of `universe`.
    pub fn sample(&self, universe: &Universe) -> Vec<f64> {
        universe.points().iter().map(|&u| self.degree(u)).collect()
    }
}
