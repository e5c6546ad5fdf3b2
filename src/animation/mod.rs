//! Frame-driven animation: clocks, easing, transitions and simulations.
//!
//! Everything here is driven by timestamps the host passes in, so the same
//! code runs under a browser frame callback, a native event loop or a test.

mod flow;
mod sliding;
mod transition;

pub use flow::{FlowConfig, FlowGroup, FlowSimulation, Person, stacked_probabilities};
pub use sliding::{SlidingWindow, next_day_point, next_day_record};
pub use transition::{Easing, Lerp, Transition};

use tracing::trace;

/// Single-threaded frame clock. Each `tick` reports the milliseconds since the
/// previous one; a stopped loop reports nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLoop {
    last: Option<f64>,
    running: bool,
    frames: u64,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self {
            last: None,
            running: true,
            frames: 0,
        }
    }
}

impl FrameLoop {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed time since the last tick; 0 on the first. Timestamps that go
    /// backwards count as no time passing.
    pub fn tick(&mut self, now_ms: f64) -> Option<f64> {
        if !self.running || !now_ms.is_finite() {
            return None;
        }
        let delta = self.last.map_or(0.0, |last| (now_ms - last).max(0.0));
        self.last = Some(now_ms);
        self.frames += 1;
        trace!(frame = self.frames, delta, "frame tick");
        Some(delta)
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Fixed-period timer driven by the frame clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    period_ms: f64,
    next_due: Option<f64>,
}

impl Interval {
    /// Periods that are not positive and finite fire on every poll.
    #[must_use]
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms: if period_ms.is_finite() && period_ms > 0.0 {
                period_ms
            } else {
                0.0
            },
            next_due: None,
        }
    }

    #[must_use]
    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }

    /// Number of periods that elapsed up to `now_ms`. The first poll starts
    /// the timer and fires nothing.
    pub fn poll(&mut self, now_ms: f64) -> usize {
        let Some(due) = self.next_due else {
            self.next_due = Some(now_ms + self.period_ms);
            return 0;
        };
        if now_ms < due {
            return 0;
        }
        if self.period_ms == 0.0 {
            self.next_due = Some(now_ms);
            return 1;
        }
        let fired = ((now_ms - due) / self.period_ms).floor() as usize + 1;
        self.next_due = Some(due + fired as f64 * self.period_ms);
        fired
    }
}
