//! Proximity of the vertical speed to terminal velocity.

use crate::error::ProximityError;

/// Terminal velocity magnitudes at or below this are treated as degenerate.
pub const MIN_TERMINAL_SPEED_MPS: f64 = 0.1;

/// `|v| / |vt|` clamped to [0, 1].
pub fn proximity_ratio(vertical_velocity_mps: f64, terminal_velocity_mps: f64) -> Result<f64, ProximityError> {
    let vt = terminal_velocity_mps.abs();
    // also catches NaN
    if !(vt > MIN_TERMINAL_SPEED_MPS) {
        return Err(ProximityError::DegenerateDivisor(terminal_velocity_mps));
    }
    Ok((vertical_velocity_mps.abs() / vt).clamp(0.0, 1.0))
}
