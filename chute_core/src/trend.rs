//! Moving-average pitch trend.

use std::collections::VecDeque;

/// Capacity derived from a persistence window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCapacity {
    pub capacity: usize,
    /// The requested window rounded below one sample (or was not finite).
    pub clamped: bool,
}

/// `max(1, round(persistence_s / dt))`.
pub fn window_capacity(persistence_s: f64, dt: f64) -> WindowCapacity {
    let ratio = (persistence_s / dt).round();
    if !ratio.is_finite() || ratio < 1.0 {
        return WindowCapacity {
            capacity: 1,
            clamped: true,
        };
    }
    WindowCapacity {
        capacity: ratio as usize,
        clamped: false,
    }
}

/// Fixed-capacity window over pitch samples.
///
/// Until the window is full the latest pitch passes straight through; after
/// that the output is the arithmetic mean of the window.
#[derive(Debug, Clone)]
pub struct TrendAverager {
    buf: VecDeque<f64>,
    capacity: usize,
    last: f64,
}

impl TrendAverager {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buf: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
            last: 0.0,
        }
    }

    pub fn push(&mut self, pitch_deg: f64) -> f64 {
        self.buf.push_back(pitch_deg);
        if self.buf.len() > self.capacity {
            self.buf.pop_front();
        }
        self.last = if self.is_full() {
            self.buf.iter().sum::<f64>() / self.buf.len() as f64
        } else {
            pitch_deg
        };
        self.last
    }

    pub fn is_full(&self) -> bool {
        self.buf.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Last value returned by `push` (0 before the first push).
    pub fn current(&self) -> f64 {
        self.last
    }
}
