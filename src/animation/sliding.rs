use std::collections::VecDeque;

use chrono::{Duration, NaiveDateTime};
use rand::Rng;
use serde_json::{Number, Value};

use crate::core::accessor::{Accessor, DateAccessor, FieldAccessor, Record};
use crate::core::scale::ContinuousScale;
use crate::error::{ChartError, ChartResult};

/// Largest day-over-day change of the random walk, either direction.
const RANDOM_WALK_STEP: f64 = 3.0;

/// Fixed-capacity series for scrolling charts: pushing past capacity drops
/// the oldest datum.
#[derive(Debug, Clone, PartialEq)]
pub struct SlidingWindow<D> {
    items: VecDeque<D>,
    capacity: usize,
}

impl<D> SlidingWindow<D> {
    pub fn new(capacity: usize) -> ChartResult<Self> {
        if capacity < 2 {
            return Err(ChartError::InvalidData(
                "sliding window needs room for at least two points".to_owned(),
            ));
        }
        Ok(Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Keeps the most recent `capacity` items of `data`.
    pub fn from_items<I>(capacity: usize, data: I) -> ChartResult<Self>
    where
        I: IntoIterator<Item = D>,
    {
        let mut window = Self::new(capacity)?;
        for item in data {
            window.push(item);
        }
        Ok(window)
    }

    /// Appends `item` and returns the datum that fell out, if any.
    pub fn push(&mut self, item: D) -> Option<D> {
        let dropped = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        dropped
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn last(&self) -> Option<&D> {
        self.items.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &D> {
        self.items.iter()
    }

    /// Contiguous view in oldest-to-newest order.
    pub fn as_slice(&mut self) -> &[D] {
        self.items.make_contiguous()
    }

    /// Pixel distance between the two newest points: how far the line must
    /// slide left so the newest point scrolls into view.
    pub fn shift_offset<S, A>(&self, scale: &S, x: &A) -> Option<f64>
    where
        S: ContinuousScale,
        A: Accessor<D, Output = S::Value>,
    {
        let newest = self.items.len().checked_sub(1)?;
        let previous = newest.checked_sub(1)?;
        let a = scale.apply(x.get(&self.items[previous])?);
        let b = scale.apply(x.get(&self.items[newest])?);
        Some(b - a)
    }
}

/// The day after `date` with `value` nudged by a uniform step in `[-3, 3)`.
pub fn next_day_point<R>(date: NaiveDateTime, value: f64, rng: &mut R) -> (NaiveDateTime, f64)
where
    R: Rng + ?Sized,
{
    let step = rng.random::<f64>() * 2.0 * RANDOM_WALK_STEP - RANDOM_WALK_STEP;
    (date + Duration::days(1), value + step)
}

/// Record-level `next_day_point`: reads the last record through the
/// accessors and writes the next day back under the same field names.
pub fn next_day_record<R>(
    last: &Record,
    date: &DateAccessor,
    value: &FieldAccessor,
    rng: &mut R,
) -> ChartResult<Record>
where
    R: Rng + ?Sized,
{
    let missing = |field: &str| ChartError::MissingField {
        field: field.to_owned(),
        index: 0,
    };
    let day = date.get(last).ok_or_else(|| missing(date.name()))?;
    let current = value.get(last).ok_or_else(|| missing(value.name()))?;
    let (next_day, next_value) = next_day_point(day, current, rng);

    let number = Number::from_f64(next_value).ok_or_else(|| {
        ChartError::InvalidData(format!("generated non-finite value for `{}`", value.name()))
    })?;
    let mut record = Record::new();
    record.insert(
        date.name().to_owned(),
        Value::String(next_day.format(date.format()).to_string()),
    );
    record.insert(value.name().to_owned(), Value::Number(number));
    Ok(record)
}
