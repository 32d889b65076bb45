//! Runtime parameter types for the decision engine.
//!
//! These are the validated-at-build structs used by `DecisionEngine`.
//! They are separate from the TOML-deserialized config in `chute_config`.

/// PID gains for the severity estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl Default for PidGains {
    fn default() -> Self {
        Self {
            kp: 5.0,
            ki: 1.0,
            kd: 0.5,
        }
    }
}

/// Deployment trigger thresholds and debounce duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerCfg {
    /// Risk strictly above this arms the timer. Default: 85.
    pub fire_threshold: f64,
    /// Risk strictly below this resets the timer. Must be < `fire_threshold`. Default: 80.
    pub reset_threshold: f64,
    /// Seconds of accumulated armed time required to deploy. Default: 2 s.
    pub min_sustained_s: f64,
}

impl Default for TriggerCfg {
    fn default() -> Self {
        Self {
            fire_threshold: 85.0,
            reset_threshold: 80.0,
            min_sustained_s: 2.0,
        }
    }
}

/// Pitch trend averaging window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendCfg {
    /// Window length in seconds; converted to samples with the run's dt.
    pub persistence_s: f64,
}

impl Default for TrendCfg {
    fn default() -> Self {
        Self { persistence_s: 3.0 }
    }
}

/// Everything the engine needs besides the rule base and the timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub pid: PidGains,
    pub trigger: TriggerCfg,
    pub trend: TrendCfg,
    /// Terminal velocity in m/s (sign ignored).
    pub terminal_velocity_mps: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            pid: PidGains::default(),
            trigger: TriggerCfg::default(),
            trend: TrendCfg::default(),
            // Default airframe: -sqrt(2 * 5 * 9.81 / (1.225 * 0.5 * 0.8))
            terminal_velocity_mps: -14.149_4,
        }
    }
}
