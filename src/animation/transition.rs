use serde::{Deserialize, Serialize};

use crate::render::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    #[default]
    CubicInOut,
}

impl Easing {
    /// Eased progress for `t`, clamped to `[0, 1]` first.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::CubicInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t * t / 2.0
                } else {
                    let t = t - 2.0;
                    (t * t * t + 2.0) / 2.0
                }
            }
        }
    }
}

/// Values a transition can blend between.
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(self, to: Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for (f64, f64) {
    fn lerp(self, to: Self, t: f64) -> Self {
        (self.0.lerp(to.0, t), self.1.lerp(to.1, t))
    }
}

impl Lerp for Color {
    fn lerp(self, to: Self, t: f64) -> Self {
        Color::rgba(
            self.red.lerp(to.red, t),
            self.green.lerp(to.green, t),
            self.blue.lerp(to.blue, t),
            self.alpha.lerp(to.alpha, t),
        )
    }
}

/// Timed blend from one value to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<T> {
    from: T,
    to: T,
    start_ms: f64,
    duration_ms: f64,
    easing: Easing,
}

impl<T: Lerp> Transition<T> {
    #[must_use]
    pub fn new(from: T, to: T, start_ms: f64, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: duration_ms.max(0.0),
            easing: Easing::default(),
        }
    }

    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    #[must_use]
    pub fn target(&self) -> T {
        self.to
    }

    /// Linear progress in `[0, 1]`; zero-length transitions jump to 1.
    #[must_use]
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms == 0.0 {
            return if now_ms >= self.start_ms { 1.0 } else { 0.0 };
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn value_at(&self, now_ms: f64) -> T {
        self.from
            .lerp(self.to, self.easing.apply(self.progress(now_ms)))
    }

    #[must_use]
    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    /// New transition from the value shown at `now_ms` toward `to`, so an
    /// interrupted animation continues without a jump.
    #[must_use]
    pub fn retarget(&self, to: T, now_ms: f64, duration_ms: f64) -> Self {
        Self::new(self.value_at(now_ms), to, now_ms, duration_ms).with_easing(self.easing)
    }
}
