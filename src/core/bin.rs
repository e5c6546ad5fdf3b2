//! Histogram binning.
//!
//! Bins are contiguous half-open intervals `[x0, x1)` covering the domain;
//! the last one is closed so the domain maximum always lands somewhere.
//! Count-based thresholds are rounded to nice tick values, which means the
//! number of bins produced is only approximately the count asked for.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::accessor::Accessor;
use crate::core::array;
use crate::error::{ChartError, ChartResult, DomainError};

/// How bin boundaries are chosen.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Thresholds {
    /// Sturges' rule on the number of values.
    #[default]
    Sturges,
    /// About this many bins, snapped to nice tick values.
    Count(usize),
    /// Explicit boundaries between bins.
    Values(Vec<f64>),
}

/// One histogram bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin<T> {
    pub x0: f64,
    pub x1: f64,
    pub members: Vec<T>,
}

impl<T> Bin<T> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    #[must_use]
    pub fn midpoint(&self) -> f64 {
        self.x0 + self.width() / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Binner {
    domain: Option<(f64, f64)>,
    thresholds: Thresholds,
}

impl Binner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the binned interval instead of using the data extent. Values
    /// outside it are dropped, and count thresholds are not niced.
    pub fn with_domain(mut self, start: f64, end: f64) -> ChartResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(DomainError::non_finite("bin").into());
        }
        if end < start {
            return Err(DomainError::not_monotonic("bin").into());
        }
        self.domain = Some((start, end));
        Ok(self)
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> ChartResult<Self> {
        match &thresholds {
            Thresholds::Count(0) => {
                return Err(ChartError::InvalidData(
                    "bin threshold count must be > 0".to_owned(),
                ));
            }
            Thresholds::Values(values) if values.iter().any(|v| !v.is_finite()) => {
                return Err(DomainError::non_finite("bin thresholds").into());
            }
            _ => {}
        }
        self.thresholds = thresholds;
        Ok(self)
    }

    #[must_use]
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Bins plain values, skipping NaN.
    pub fn bin_values(&self, values: &[f64]) -> ChartResult<Vec<Bin<f64>>> {
        let keyed: Vec<(f64, f64)> = values
            .iter()
            .filter(|v| !v.is_nan())
            .map(|v| (*v, *v))
            .collect();
        self.bin_keyed(keyed)
    }

    /// Bins records by the value `accessor` reads. Records it cannot read
    /// are skipped.
    pub fn bin_by<'a, D, A>(&self, data: &'a [D], accessor: &A) -> ChartResult<Vec<Bin<&'a D>>>
    where
        A: Accessor<D, Output = f64>,
    {
        let keyed: Vec<(f64, &'a D)> = data
            .iter()
            .filter_map(|datum| {
                accessor
                    .get(datum)
                    .filter(|value| !value.is_nan())
                    .map(|value| (value, datum))
            })
            .collect();
        self.bin_keyed(keyed)
    }

    fn bin_keyed<T>(&self, keyed: Vec<(f64, T)>) -> ChartResult<Vec<Bin<T>>> {
        let (x0, x1, thresholds, step) = self.layout(&keyed)?;
        let m = thresholds.len();

        let mut bins: Vec<Bin<T>> = (0..=m)
            .map(|i| Bin {
                x0: if i > 0 { thresholds[i - 1] } else { x0 },
                x1: if i < m { thresholds[i] } else { x1 },
                members: Vec::new(),
            })
            .collect();

        let total = keyed.len();
        let mut kept = 0usize;
        for (value, member) in keyed {
            if !(x0 <= value && value <= x1) {
                continue;
            }
            let index = match step {
                Some(step) if step > 0.0 => ((value - x0) / step).floor() as usize,
                Some(step) => {
                    let j = ((x0 - value) * step).floor() as usize;
                    j + usize::from(thresholds.get(j).is_some_and(|t| *t <= value))
                }
                None => array::bisect_right(&thresholds, value),
            };
            bins[index.min(m)].members.push(member);
            kept += 1;
        }

        debug!(
            bins = bins.len(),
            values = total,
            binned = kept,
            x0,
            x1,
            "binned values"
        );
        Ok(bins)
    }

    /// Resolves `(x0, x1, thresholds strictly inside the domain, uniform step)`.
    fn layout<T>(&self, keyed: &[(f64, T)]) -> ChartResult<(f64, f64, Vec<f64>, Option<f64>)> {
        let (mut x0, mut x1) = match self.domain {
            Some(domain) => domain,
            None => array::extent(keyed.iter().map(|(value, _)| *value))
                .ok_or_else(|| DomainError::empty("bin"))?,
        };
        if !x0.is_finite() || !x1.is_finite() {
            return Err(DomainError::non_finite("bin").into());
        }
        let from_extent = self.domain.is_none();
        let mut step = None;

        let mut thresholds = match &self.thresholds {
            Thresholds::Values(values) => {
                let mut values = values.clone();
                values.sort_by(f64::total_cmp);
                values.dedup();
                values
            }
            counted => {
                let count = match counted {
                    Thresholds::Count(count) => *count,
                    _ => array::threshold_sturges(keyed.len()),
                };
                let max = x1;
                if from_extent {
                    (x0, x1) = array::nice(x0, x1, count);
                }
                let mut ticks = array::ticks(x0, x1, count);
                if ticks.first().is_some_and(|first| *first <= x0) {
                    step = Some(array::tick_increment(x0, x1, count)).filter(|s| s.is_finite());
                }
                if ticks.last().is_some_and(|last| *last >= x1) {
                    if max >= x1 && from_extent {
                        // The maximum sits on a tick: grow the domain by one
                        // step so it opens a final bin instead of being cut.
                        let increment = array::tick_increment(x0, x1, count);
                        if increment > 0.0 {
                            x1 = ((x1 / increment).floor() + 1.0) * increment;
                        } else if increment < 0.0 {
                            x1 = ((x1 * -increment).ceil() + 1.0) / -increment;
                        }
                    } else {
                        ticks.pop();
                    }
                }
                ticks
            }
        };

        thresholds.retain(|t| *t > x0 && *t <= x1);
        if thresholds.last().is_some_and(|last| *last >= x1) && step.is_none() {
            // Explicit thresholds at the domain maximum would open an empty
            // zero-width bin; fold it into the previous one.
            thresholds.pop();
        }
        Ok((x0, x1, thresholds, step))
    }
}
