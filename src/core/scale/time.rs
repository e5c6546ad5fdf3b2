use chrono::{DateTime, NaiveDateTime};

use crate::core::array;
use crate::core::scale::{ContinuousScale, DomainValue, LinearScale};
use crate::core::time_interval::{
    MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_MONTH, MILLIS_PER_SECOND,
    MILLIS_PER_WEEK, MILLIS_PER_YEAR, TimeInterval, TimeUnit, multi_format,
};
use crate::error::{ChartResult, DomainError};

/// Candidate tick intervals ordered by nominal duration.
const TICK_INTERVALS: [(TimeUnit, u32, i64); 18] = [
    (TimeUnit::Second, 1, MILLIS_PER_SECOND),
    (TimeUnit::Second, 5, 5 * MILLIS_PER_SECOND),
    (TimeUnit::Second, 15, 15 * MILLIS_PER_SECOND),
    (TimeUnit::Second, 30, 30 * MILLIS_PER_SECOND),
    (TimeUnit::Minute, 1, MILLIS_PER_MINUTE),
    (TimeUnit::Minute, 5, 5 * MILLIS_PER_MINUTE),
    (TimeUnit::Minute, 15, 15 * MILLIS_PER_MINUTE),
    (TimeUnit::Minute, 30, 30 * MILLIS_PER_MINUTE),
    (TimeUnit::Hour, 1, MILLIS_PER_HOUR),
    (TimeUnit::Hour, 3, 3 * MILLIS_PER_HOUR),
    (TimeUnit::Hour, 6, 6 * MILLIS_PER_HOUR),
    (TimeUnit::Hour, 12, 12 * MILLIS_PER_HOUR),
    (TimeUnit::Day, 1, MILLIS_PER_DAY),
    (TimeUnit::Day, 2, 2 * MILLIS_PER_DAY),
    (TimeUnit::Week, 1, MILLIS_PER_WEEK),
    (TimeUnit::Month, 1, MILLIS_PER_MONTH),
    (TimeUnit::Month, 3, 3 * MILLIS_PER_MONTH),
    (TimeUnit::Year, 1, MILLIS_PER_YEAR),
];

/// Linear mapping over wall-clock date-times with calendar-aware ticks.
///
/// Internally the domain is stored as epoch milliseconds, so all numeric
/// behavior (clamping, inversion, degenerate domains) matches `LinearScale`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeScale {
    linear: LinearScale,
}

impl TimeScale {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, range: (f64, f64)) -> ChartResult<Self> {
        Ok(Self {
            linear: LinearScale::linear(start.to_f64(), end.to_f64(), range.0, range.1)?,
        })
    }

    /// Builds `[earliest, latest] -> range` from a dataset.
    pub fn from_extent<I>(values: I, range: (f64, f64)) -> ChartResult<Self>
    where
        I: IntoIterator<Item = NaiveDateTime>,
    {
        let mut iter = values.into_iter();
        let first = iter.next().ok_or_else(|| DomainError::empty("time scale"))?;
        let (min, max) = iter.fold((first, first), |(min, max), value| {
            (min.min(value), max.max(value))
        });
        if min == max {
            return Err(DomainError::Degenerate {
                name: "time scale".to_owned(),
                value: min.to_f64(),
            }
            .into());
        }
        Self::new(min, max, range)
    }

    #[must_use]
    pub fn domain(&self) -> (NaiveDateTime, NaiveDateTime) {
        let (start, end) = self.linear.domain_extent();
        (from_millis(start), from_millis(end))
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        ContinuousScale::range_extent(&self.linear)
    }

    #[must_use]
    pub fn with_clamp(self, clamp: bool) -> Self {
        Self {
            linear: self.linear.with_clamp(clamp),
        }
    }

    pub fn with_range(&self, range: (f64, f64)) -> ChartResult<Self> {
        Ok(Self {
            linear: self.linear.with_range(&[range.0, range.1])?,
        })
    }

    #[must_use]
    pub fn apply(&self, time: NaiveDateTime) -> f64 {
        self.linear.apply(time.to_f64())
    }

    #[must_use]
    pub fn invert(&self, pixel: f64) -> NaiveDateTime {
        from_millis(self.linear.invert(pixel))
    }

    /// Interval whose ticks come closest to `count` across the domain.
    #[must_use]
    pub fn tick_interval(&self, count: usize) -> TimeInterval {
        let (start, end) = self.linear.domain_extent();
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        pick_interval(start, end, count.max(1))
    }

    /// Extends the domain outward to boundaries of the tick interval.
    #[must_use]
    pub fn nice(self, count: usize) -> Self {
        let (start, end) = self.domain();
        let descending = end < start;
        let (lo, hi) = if descending { (end, start) } else { (start, end) };
        let interval = self.tick_interval(count);
        let (lo, hi) = (interval.floor(lo), interval.ceil(hi));
        let (first, last) = if descending { (hi, lo) } else { (lo, hi) };

        let range = self.range();
        let clamp = self.linear.is_clamped();
        match LinearScale::linear(first.to_f64(), last.to_f64(), range.0, range.1) {
            Ok(linear) => Self {
                linear: linear.with_clamp(clamp),
            },
            Err(_) => self,
        }
    }

    /// Calendar-aligned tick values inside the domain, inclusive of both ends.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<NaiveDateTime> {
        let (start, end) = self.domain();
        let descending = end < start;
        let (lo, hi) = if descending { (end, start) } else { (start, end) };
        let interval = self.tick_interval(count);
        let mut ticks = interval.range(lo, hi + chrono::Duration::milliseconds(1));
        if descending {
            ticks.reverse();
        }
        ticks
    }

    #[must_use]
    pub fn tick_format(&self) -> impl Fn(NaiveDateTime) -> String + use<> {
        multi_format
    }
}

impl ContinuousScale for TimeScale {
    type Value = NaiveDateTime;

    fn apply(&self, value: NaiveDateTime) -> f64 {
        TimeScale::apply(self, value)
    }

    fn invert(&self, pixel: f64) -> NaiveDateTime {
        TimeScale::invert(self, pixel)
    }

    fn range_extent(&self) -> (f64, f64) {
        self.range()
    }
}

fn pick_interval(start: f64, end: f64, count: usize) -> TimeInterval {
    let target = (end - start).abs() / count as f64;
    let index = TICK_INTERVALS.partition_point(|(_, _, millis)| (*millis as f64) <= target);

    if index == TICK_INTERVALS.len() {
        let years = MILLIS_PER_YEAR as f64;
        let step = array::tick_step(start / years, end / years, count).abs();
        return TimeInterval::every(TimeUnit::Year, step.round().max(1.0) as u32);
    }
    if index == 0 {
        let step = array::tick_step(start, end, count).abs();
        let step = if step.is_finite() { step.round().max(1.0) } else { 1.0 };
        return TimeInterval::every(TimeUnit::Millisecond, step as u32);
    }

    let (lower_unit, lower_step, lower_millis) = TICK_INTERVALS[index - 1];
    let (upper_unit, upper_step, upper_millis) = TICK_INTERVALS[index];
    if target / (lower_millis as f64) < (upper_millis as f64) / target {
        TimeInterval::every(lower_unit, lower_step)
    } else {
        TimeInterval::every(upper_unit, upper_step)
    }
}

fn from_millis(millis: f64) -> NaiveDateTime {
    let min = NaiveDateTime::MIN.and_utc().timestamp_millis();
    let max = NaiveDateTime::MAX.and_utc().timestamp_millis();
    if millis.is_nan() {
        return NaiveDateTime::MIN;
    }
    let clamped = millis.round().clamp(min as f64, max as f64) as i64;
    DateTime::from_timestamp_millis(clamped)
        .map(|time| time.naive_utc())
        .unwrap_or(NaiveDateTime::MIN)
}
