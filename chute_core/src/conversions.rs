//! `From` implementations bridging `chute_config` types to `chute_core` types.

use crate::config::{Parameters, PidGains, TrendCfg, TriggerCfg};

// ── PidGains ─────────────────────────────────────────────────────────────────

impl From<&chute_config::PidCfg> for PidGains {
    fn from(c: &chute_config::PidCfg) -> Self {
        Self {
            kp: c.kp,
            ki: c.ki,
            kd: c.kd,
        }
    }
}

// ── TriggerCfg ───────────────────────────────────────────────────────────────

impl From<&chute_config::TriggerCfg> for TriggerCfg {
    fn from(c: &chute_config::TriggerCfg) -> Self {
        Self {
            fire_threshold: c.fire_threshold,
            reset_threshold: c.reset_threshold,
            min_sustained_s: c.min_sustained_s,
        }
    }
}

// ── TrendCfg ─────────────────────────────────────────────────────────────────

impl From<&chute_config::TrendCfg> for TrendCfg {
    fn from(c: &chute_config::TrendCfg) -> Self {
        Self {
            persistence_s: c.persistence_s,
        }
    }
}

// ── Parameters ───────────────────────────────────────────────────────────────

impl From<&chute_config::Config> for Parameters {
    fn from(c: &chute_config::Config) -> Self {
        Self {
            pid: (&c.pid).into(),
            trigger: (&c.trigger).into(),
            trend: (&c.trend).into(),
            terminal_velocity_mps: c.vehicle.terminal_velocity_mps(),
        }
    }
}
