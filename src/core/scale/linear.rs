use smallvec::SmallVec;

use crate::core::array;
use crate::core::scale::ContinuousScale;
use crate::error::{ChartError, ChartResult, DomainError};

type Stops = SmallVec<[f64; 3]>;

/// Piecewise-linear mapping from numeric domain stops to range stops.
///
/// Two stops give a plain linear scale; more stops give a polylinear scale
/// (for example a diverging `[-m, 0, m]` domain). Domain stops must be
/// strictly monotonic, except that a two-stop domain may be degenerate, in
/// which case every input maps to the middle of the range.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearScale {
    domain: Stops,
    range: Stops,
    clamp: bool,
}

impl LinearScale {
    pub fn new(domain: &[f64], range: &[f64]) -> ChartResult<Self> {
        validate_stops("linear scale", domain, range)?;
        Ok(Self {
            domain: SmallVec::from_slice(domain),
            range: SmallVec::from_slice(range),
            clamp: false,
        })
    }

    pub fn linear(d0: f64, d1: f64, r0: f64, r1: f64) -> ChartResult<Self> {
        Self::new(&[d0, d1], &[r0, r1])
    }

    /// Builds `[min, max] -> range` from the finite values of a dataset.
    ///
    /// Fails with `DomainError::Empty` when there are no finite values and
    /// with `DomainError::Degenerate` when they are all equal.
    pub fn from_extent<I>(values: I, range: (f64, f64)) -> ChartResult<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let (min, max) = array::extent(values).ok_or_else(|| DomainError::empty("linear scale"))?;
        if min == max {
            return Err(DomainError::Degenerate {
                name: "linear scale".to_owned(),
                value: min,
            }
            .into());
        }
        Self::linear(min, max, range.0, range.1)
    }

    #[must_use]
    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    #[must_use]
    pub fn range(&self) -> &[f64] {
        &self.range
    }

    /// First and last domain stops.
    #[must_use]
    pub fn domain_extent(&self) -> (f64, f64) {
        (self.domain[0], self.domain[self.domain.len() - 1])
    }

    #[must_use]
    pub fn is_clamped(&self) -> bool {
        self.clamp
    }

    #[must_use]
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Replaces the range while keeping domain and clamping.
    pub fn with_range(&self, range: &[f64]) -> ChartResult<Self> {
        validate_stops("linear scale", &self.domain, range)?;
        Ok(Self {
            domain: self.domain.clone(),
            range: SmallVec::from_slice(range),
            clamp: self.clamp,
        })
    }

    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        let value = if self.clamp {
            let (lo, hi) = ordered(self.domain_extent());
            value.clamp(lo, hi)
        } else {
            value
        };
        piecewise(&self.domain, &self.range, value)
    }

    /// Maps a range value back into the domain.
    ///
    /// Requires a monotonic range; with clamping the result stays in the domain.
    #[must_use]
    pub fn invert(&self, pixel: f64) -> f64 {
        let pixel = if self.clamp {
            let (lo, hi) = ordered((self.range[0], self.range[self.range.len() - 1]));
            pixel.clamp(lo, hi)
        } else {
            pixel
        };
        piecewise(&self.range, &self.domain, pixel)
    }

    /// Extends the outer domain stops to round values.
    ///
    /// The niced domain always contains the original one.
    #[must_use]
    pub fn nice(mut self, count: usize) -> Self {
        let last = self.domain.len() - 1;
        let (first, end) = (self.domain[0], self.domain[last]);
        let descending = end < first;
        let (lo, hi) = if descending { (end, first) } else { (first, end) };
        let (nice_lo, nice_hi) = array::nice(lo, hi, count);
        if descending {
            self.domain[0] = nice_hi;
            self.domain[last] = nice_lo;
        } else {
            self.domain[0] = nice_lo;
            self.domain[last] = nice_hi;
        }
        self
    }

    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (start, end) = self.domain_extent();
        array::ticks(start, end, count)
    }

    /// Formatter with enough precision to distinguish `ticks(count)`.
    #[must_use]
    pub fn tick_format(&self, count: usize) -> impl Fn(f64) -> String + use<> {
        let (start, end) = self.domain_extent();
        let precision = array::precision_fixed(array::tick_step(start, end, count));
        move |value| array::format_grouped(value, precision)
    }
}

impl ContinuousScale for LinearScale {
    type Value = f64;

    fn apply(&self, value: f64) -> f64 {
        LinearScale::apply(self, value)
    }

    fn invert(&self, pixel: f64) -> f64 {
        LinearScale::invert(self, pixel)
    }

    fn range_extent(&self) -> (f64, f64) {
        (self.range[0], self.range[self.range.len() - 1])
    }
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

pub(crate) fn validate_stops(name: &str, domain: &[f64], range: &[f64]) -> ChartResult<()> {
    if domain.len() != range.len() {
        return Err(DomainError::StopCountMismatch {
            name: name.to_owned(),
            domain: domain.len(),
            range: range.len(),
        }
        .into());
    }
    if domain.len() < 2 {
        return Err(ChartError::InvalidData(format!(
            "{name} needs at least two stops"
        )));
    }
    if domain.iter().any(|value| !value.is_finite()) {
        return Err(DomainError::non_finite(name).into());
    }
    if range.iter().any(|value| !value.is_finite()) {
        return Err(ChartError::InvalidData(format!(
            "{name} range stops must be finite"
        )));
    }
    if domain.len() > 2 {
        let ascending = domain.windows(2).all(|pair| pair[0] < pair[1]);
        let descending = domain.windows(2).all(|pair| pair[0] > pair[1]);
        if !ascending && !descending {
            return Err(DomainError::not_monotonic(name).into());
        }
    }
    Ok(())
}

/// Interpolates `x` from `from` stops onto `to` stops segment by segment.
pub(crate) fn piecewise(from: &[f64], to: &[f64], x: f64) -> f64 {
    let n = from.len();
    if n == 2 {
        return to[0] + normalize(from[0], from[1], x) * (to[1] - to[0]);
    }

    let (segment, lo, hi) = if from[n - 1] < from[0] {
        // Descending stops: search the mirrored sequence.
        let mirrored: Stops = from.iter().rev().copied().collect();
        let index = array::bisect_right(&mirrored[1..n - 1], x);
        let segment = n - 2 - index;
        (segment, from[segment], from[segment + 1])
    } else {
        let segment = array::bisect_right(&from[1..n - 1], x);
        (segment, from[segment], from[segment + 1])
    };
    let t = normalize(lo, hi, x);
    to[segment] + t * (to[segment + 1] - to[segment])
}

fn normalize(a: f64, b: f64, x: f64) -> f64 {
    let span = b - a;
    if span == 0.0 {
        if x.is_nan() { f64::NAN } else { 0.5 }
    } else {
        (x - a) / span
    }
}
