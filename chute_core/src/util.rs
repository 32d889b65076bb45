//! Timestep helpers.

use chute_traits::Sample;

/// Timestep used when fewer than two samples are available.
pub const DEFAULT_DT_S: f64 = 1.0;

/// Uniform timestep from the first two samples, or `DEFAULT_DT_S`.
#[inline]
pub fn derive_dt(samples: &[Sample]) -> f64 {
    match samples {
        [a, b, ..] => b.time_s - a.time_s,
        _ => DEFAULT_DT_S,
    }
}

/// Index of the first sample whose time does not strictly exceed its predecessor's.
pub fn first_non_increasing(samples: &[Sample]) -> Option<usize> {
    samples
        .windows(2)
        .position(|w| !(w[1].time_s > w[0].time_s))
        .map(|i| i + 1)
}
