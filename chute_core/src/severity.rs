//! PID-style severity estimator over vertical velocity.

use crate::config::PidGains;

pub const SEVERITY_MIN: f64 = 0.0;
pub const SEVERITY_MAX: f64 = 100.0;

/// Mutable controller state; one per run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PidState {
    pub integral: f64,
    /// `None` until the first update.
    pub prev_error: Option<f64>,
    pub last_output: f64,
}

/// Setpoint-zero PID on vertical velocity, output clamped to [0, 100].
///
/// The integral is not limited beyond the output clamp. The first update has
/// no previous error and contributes no derivative term.
#[derive(Debug, Clone)]
pub struct SeverityEstimator {
    gains: PidGains,
    state: PidState,
}

impl SeverityEstimator {
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            state: PidState::default(),
        }
    }

    /// Feed one vertical velocity (m/s, negative when falling) and return the severity.
    pub fn update(&mut self, vertical_velocity_mps: f64, dt: f64) -> f64 {
        let error = 0.0 - vertical_velocity_mps;
        self.state.integral += error * dt;
        let derivative = match self.state.prev_error {
            Some(prev) if dt > 0.0 => (error - prev) / dt,
            _ => 0.0,
        };
        let raw = self.gains.kp * error + self.gains.ki * self.state.integral + self.gains.kd * derivative;
        let out = raw.clamp(SEVERITY_MIN, SEVERITY_MAX);
        self.state.prev_error = Some(error);
        self.state.last_output = out;
        out
    }

    pub fn state(&self) -> &PidState {
        &self.state
    }

    pub fn last_output(&self) -> f64 {
        self.state.last_output
    }

    pub fn gains(&self) -> &PidGains {
        &self.gains
    }
}
