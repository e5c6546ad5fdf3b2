//! Scales map a data domain onto a pixel or color range.

mod band;
mod color;
mod linear;
mod ordinal;
mod time;

pub use band::BandScale;
pub use color::{ColorInterpolator, ColorScale, ColorSpace, DivergingScale, SequentialScale};
pub use linear::LinearScale;
pub use ordinal::OrdinalScale;
pub use time::TimeScale;

use chrono::NaiveDateTime;

/// Domain values that continuous scales can measure distances over.
pub trait DomainValue: Copy {
    fn to_f64(self) -> f64;
}

impl DomainValue for f64 {
    fn to_f64(self) -> f64 {
        self
    }
}

impl DomainValue for NaiveDateTime {
    fn to_f64(self) -> f64 {
        self.and_utc().timestamp_millis() as f64
    }
}

/// Monotonic, invertible mapping from a continuous domain to pixels.
pub trait ContinuousScale {
    type Value: DomainValue;

    fn apply(&self, value: Self::Value) -> f64;

    /// Pixel back to domain value. `invert(apply(x)) ≈ x` inside the domain.
    fn invert(&self, pixel: f64) -> Self::Value;

    /// First and last range stops.
    fn range_extent(&self) -> (f64, f64);
}
