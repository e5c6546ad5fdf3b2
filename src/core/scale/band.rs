use indexmap::IndexSet;

use crate::error::{ChartError, ChartResult};

/// Divides a continuous range into uniform bands, one per category.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: IndexSet<String>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    step: f64,
    bandwidth: f64,
    starts: Vec<f64>,
}

impl BandScale {
    pub fn new<I, S>(domain: I, range: (f64, f64)) -> ChartResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "band scale range must be finite".to_owned(),
            ));
        }
        let mut scale = Self {
            domain: domain.into_iter().map(Into::into).collect(),
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
            step: 0.0,
            bandwidth: 0.0,
            starts: Vec::new(),
        };
        scale.rescale();
        Ok(scale)
    }

    /// Sets inner and outer padding as fractions of the step.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> ChartResult<Self> {
        if !(0.0..=1.0).contains(&inner) || !outer.is_finite() || outer < 0.0 {
            return Err(ChartError::InvalidData(
                "band padding must satisfy 0 <= inner <= 1 and outer >= 0".to_owned(),
            ));
        }
        self.padding_inner = inner;
        self.padding_outer = outer;
        self.rescale();
        Ok(self)
    }

    /// Positions leftover space: 0 hugs the range start, 1 the end.
    pub fn with_align(mut self, align: f64) -> ChartResult<Self> {
        if !(0.0..=1.0).contains(&align) {
            return Err(ChartError::InvalidData(
                "band align must be in [0, 1]".to_owned(),
            ));
        }
        self.align = align;
        self.rescale();
        Ok(self)
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Start of the band for `key`, or `None` for unknown categories.
    #[must_use]
    pub fn apply(&self, key: &str) -> Option<f64> {
        self.domain
            .get_index_of(key)
            .map(|position| self.starts[position])
    }

    #[must_use]
    pub fn center(&self, key: &str) -> Option<f64> {
        self.apply(key).map(|start| start + self.bandwidth / 2.0)
    }

    fn rescale(&mut self) {
        let n = self.domain.len() as f64;
        let reverse = self.range.1 < self.range.0;
        let (mut start, stop) = if reverse {
            (self.range.1, self.range.0)
        } else {
            (self.range.0, self.range.1)
        };

        self.step = (stop - start) / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        start += (stop - start - self.step * (n - self.padding_inner)) * self.align;
        self.bandwidth = self.step * (1.0 - self.padding_inner);
        self.starts = (0..self.domain.len())
            .map(|i| start + self.step * i as f64)
            .collect();
        if reverse {
            self.starts.reverse();
        }
    }
}
