//! Array statistics and tick math shared by scales, bins and axes.
//!
//! Missing values are modeled as non-finite floats and are skipped by every
//! reducer here, so a single bad record never poisons an extent.

use std::hash::Hash;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;

const E10: f64 = 7.071_067_811_865_476; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Returns `(min, max)` over the finite values, or `None` when there are none.
#[must_use]
pub fn extent<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|value| value.is_finite())
        .fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        })
}

#[must_use]
pub fn min<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    extent(values).map(|(min, _)| min)
}

#[must_use]
pub fn max<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    extent(values).map(|(_, max)| max)
}

#[must_use]
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .filter(|value| value.is_finite())
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Median with linear interpolation between the two middle values.
#[must_use]
pub fn median<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut sorted: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let position = (sorted.len() - 1) as f64 * 0.5;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Index of the smallest finite key. Ties resolve to the first index.
#[must_use]
pub fn least_index<I>(keys: I) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    keys.into_iter()
        .enumerate()
        .filter(|(_, key)| !key.is_nan())
        .min_by_key(|(index, key)| (OrderedFloat(*key), *index))
        .map(|(index, _)| index)
}

/// Insertion point to the right of any entries equal to `value`.
///
/// `sorted` must be ascending.
#[must_use]
pub fn bisect_right(sorted: &[f64], value: f64) -> usize {
    sorted.partition_point(|probe| *probe <= value)
}

/// Arithmetic progression `[start, stop)` with the given step.
#[must_use]
pub fn range(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step == 0.0 || !step.is_finite() || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    let count = ((stop - start) / step).ceil().max(0.0) as usize;
    (0..count).map(|i| start + i as f64 * step).collect()
}

/// Groups items by key, preserving first-seen key order.
pub fn group<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> IndexMap<K, Vec<T>>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut groups: IndexMap<K, Vec<T>> = IndexMap::new();
    for item in items {
        groups.entry(key(&item)).or_default().push(item);
    }
    groups
}

/// Sturges' rule for the default histogram threshold count.
#[must_use]
pub fn threshold_sturges(count: usize) -> usize {
    if count <= 1 {
        return 1;
    }
    ((count as f64).log2().ceil() as usize + 1).max(1)
}

/// `(i1, i2, increment)` such that ticks are `i * increment` (or `i / -increment`
/// when `increment` is negative, which keeps fractional steps exact).
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        inc = 10f64.powf(-power) / factor;
        i1 = (start * inc).round();
        i2 = (stop * inc).round();
        if i1 / inc < start {
            i1 += 1.0;
        }
        if i2 / inc > stop {
            i2 -= 1.0;
        }
        if i2 < i1 && (0.5..2.0).contains(&count) {
            return tick_spec(start, stop, count * 2.0);
        }
        return (i1, i2, -inc);
    }

    inc = 10f64.powf(power) * factor;
    i1 = (start / inc).round();
    i2 = (stop / inc).round();
    if i1 * inc < start {
        i1 += 1.0;
    }
    if i2 * inc > stop {
        i2 -= 1.0;
    }
    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Human-friendly tick values covering `[start, stop]`, about `count` of them.
#[must_use]
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_spec(lo, hi, count as f64);
    if !(i2 >= i1) || !inc.is_finite() {
        return Vec::new();
    }

    let n = (i2 - i1 + 1.0) as usize;
    let mut out: Vec<f64> = (0..n)
        .map(|i| {
            let index = i1 + i as f64;
            if inc < 0.0 { index / -inc } else { index * inc }
        })
        .collect();
    if reverse {
        out.reverse();
    }
    out
}

/// Signed tick increment; negative values encode `1 / -increment`.
#[must_use]
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    if start == stop || count == 0 {
        return f64::NAN;
    }
    tick_spec(start, stop, count as f64).2
}

/// Absolute distance between adjacent ticks, signed by direction.
#[must_use]
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let reverse = stop < start;
    let inc = if reverse {
        tick_increment(stop, start, count)
    } else {
        tick_increment(start, stop, count)
    };
    let magnitude = if inc < 0.0 { 1.0 / -inc } else { inc };
    if reverse { -magnitude } else { magnitude }
}

/// Expands `[start, stop]` outward to tick-aligned bounds.
///
/// The result always contains the input interval.
#[must_use]
pub fn nice(mut start: f64, mut stop: f64, count: usize) -> (f64, f64) {
    let mut previous = f64::NAN;
    for _ in 0..10 {
        let step = tick_increment(start, stop, count);
        if step == previous || step == 0.0 || !step.is_finite() {
            break;
        }
        if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        }
        previous = step;
    }
    (start, stop)
}

/// Number of fraction digits needed to tell ticks `step` apart.
#[must_use]
pub fn precision_fixed(step: f64) -> usize {
    let step = step.abs();
    if step == 0.0 || !step.is_finite() {
        return 0;
    }
    (-step.log10().floor()).max(0.0) as usize
}

/// Fixed-precision number with thousands grouping, e.g. `12,345.6`.
#[must_use]
pub fn format_grouped(value: f64, precision: usize) -> String {
    let raw = format!("{:.*}", precision, value.abs());
    let (integer, fraction) = match raw.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (raw.as_str(), None),
    };

    let mut grouped = String::with_capacity(raw.len() + integer.len() / 3 + 1);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    let is_zero = raw.chars().all(|ch| ch == '0' || ch == '.');
    if value.is_sign_negative() && !is_zero {
        grouped.insert(0, '-');
    }
    grouped
}
