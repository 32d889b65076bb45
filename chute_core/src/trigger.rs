//! Hysteresis debounce between risk and the deployment decision.

use crate::config::TriggerCfg;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerPhase {
    #[default]
    Idle,
    Armed,
    /// Terminal.
    Fired,
}

impl TriggerPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Armed => "armed",
            Self::Fired => "fired",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TriggerState {
    pub accumulated_s: f64,
    pub phase: TriggerPhase,
    pub fire_time: Option<f64>,
}

/// Transition produced by one update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerEvent {
    Unchanged,
    Armed,
    Reset,
    Fired { time_s: f64 },
}

#[derive(Debug, Clone)]
pub struct TriggerStateMachine {
    cfg: TriggerCfg,
    state: TriggerState,
}

impl TriggerStateMachine {
    pub fn new(cfg: TriggerCfg) -> Self {
        Self {
            cfg,
            state: TriggerState::default(),
        }
    }

    /// Advance by one step of `dt` seconds at time `now_s` with the given risk.
    ///
    /// Risk above the fire threshold accumulates; below the reset threshold
    /// clears; inside the band an armed timer keeps accumulating. It fires as
    /// soon as the accumulated time reaches the minimum, so a zero minimum
    /// fires on the first update whatever the risk. Once fired the state no
    /// longer changes.
    pub fn update(&mut self, risk: f64, dt: f64, now_s: f64) -> TriggerEvent {
        let s = &mut self.state;
        if s.phase == TriggerPhase::Fired {
            return TriggerEvent::Unchanged;
        }
        let before = s.phase;
        if risk > self.cfg.fire_threshold {
            s.accumulated_s += dt;
            s.phase = TriggerPhase::Armed;
        } else if risk < self.cfg.reset_threshold {
            s.accumulated_s = 0.0;
            s.phase = TriggerPhase::Idle;
        } else if s.phase == TriggerPhase::Armed {
            s.accumulated_s += dt;
        }

        if s.accumulated_s >= self.cfg.min_sustained_s {
            s.phase = TriggerPhase::Fired;
            s.fire_time = Some(now_s);
            return TriggerEvent::Fired { time_s: now_s };
        }
        match (before, s.phase) {
            (TriggerPhase::Idle, TriggerPhase::Armed) => TriggerEvent::Armed,
            (TriggerPhase::Armed, TriggerPhase::Idle) => TriggerEvent::Reset,
            _ => TriggerEvent::Unchanged,
        }
    }

    pub fn state(&self) -> &TriggerState {
        &self.state
    }

    pub fn phase(&self) -> TriggerPhase {
        self.state.phase
    }

    pub fn cfg(&self) -> &TriggerCfg {
        &self.cfg
    }
}
