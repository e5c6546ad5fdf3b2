//! Calendar intervals for time ticks, niceing and date stepping.
//!
//! Stepped intervals (`every`) keep calendar alignment: a two-day interval
//! lands on odd days of the month and restarts at the 1st, rather than
//! drifting by 48 hours across month boundaries.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;
pub const MILLIS_PER_WEEK: i64 = 7 * MILLIS_PER_DAY;
pub const MILLIS_PER_MONTH: i64 = 30 * MILLIS_PER_DAY;
pub const MILLIS_PER_YEAR: i64 = 365 * MILLIS_PER_DAY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    /// Sunday-based weeks.
    Week,
    Month,
    Year,
}

impl TimeUnit {
    /// Nominal length used to pick tick intervals.
    #[must_use]
    pub fn approx_millis(self) -> i64 {
        match self {
            Self::Millisecond => 1,
            Self::Second => MILLIS_PER_SECOND,
            Self::Minute => MILLIS_PER_MINUTE,
            Self::Hour => MILLIS_PER_HOUR,
            Self::Day => MILLIS_PER_DAY,
            Self::Week => MILLIS_PER_WEEK,
            Self::Month => MILLIS_PER_MONTH,
            Self::Year => MILLIS_PER_YEAR,
        }
    }
}

/// A unit plus a step count, e.g. `Month x 3` for quarters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    pub unit: TimeUnit,
    pub step: u32,
}

impl TimeInterval {
    #[must_use]
    pub const fn new(unit: TimeUnit) -> Self {
        Self { unit, step: 1 }
    }

    #[must_use]
    pub const fn every(unit: TimeUnit, step: u32) -> Self {
        Self {
            unit,
            step: if step == 0 { 1 } else { step },
        }
    }

    /// Latest boundary at or before `time`.
    #[must_use]
    pub fn floor(self, time: NaiveDateTime) -> NaiveDateTime {
        if self.unit == TimeUnit::Millisecond {
            let millis = time.and_utc().timestamp_millis();
            let excess = millis.rem_euclid(i64::from(self.step));
            return time - Duration::milliseconds(excess);
        }
        let mut floored = floor_unit(self.unit, time);
        if self.step > 1 {
            // Step back one unit at a time until the calendar field aligns.
            for _ in 0..self.step {
                if self.aligned(floored) {
                    break;
                }
                floored = offset_unit(self.unit, floored, -1);
            }
        }
        floored
    }

    /// Earliest boundary at or after `time`.
    #[must_use]
    pub fn ceil(self, time: NaiveDateTime) -> NaiveDateTime {
        let floored = self.floor(time);
        if floored == time {
            time
        } else {
            self.next_boundary(floored)
        }
    }

    /// The boundary immediately after an aligned `boundary`.
    #[must_use]
    pub fn next_boundary(self, boundary: NaiveDateTime) -> NaiveDateTime {
        if self.unit == TimeUnit::Millisecond {
            return boundary + Duration::milliseconds(i64::from(self.step));
        }
        let mut next = offset_unit(self.unit, boundary, 1);
        for _ in 0..self.step {
            if self.aligned(next) {
                break;
            }
            next = offset_unit(self.unit, next, 1);
        }
        next
    }

    /// Shifts `time` by `count` steps of this interval without realigning.
    #[must_use]
    pub fn offset(self, time: NaiveDateTime, count: i64) -> NaiveDateTime {
        offset_unit(self.unit, time, count * i64::from(self.step))
    }

    /// Boundaries in `[start, stop)`.
    #[must_use]
    pub fn range(self, start: NaiveDateTime, stop: NaiveDateTime) -> Vec<NaiveDateTime> {
        let mut out = Vec::new();
        let mut current = self.ceil(start);
        while current < stop {
            out.push(current);
            let next = self.next_boundary(current);
            if next <= current {
                break;
            }
            current = next;
        }
        out
    }

    fn aligned(self, time: NaiveDateTime) -> bool {
        let step = self.step;
        match self.unit {
            TimeUnit::Millisecond => {
                time.and_utc().timestamp_millis() % i64::from(step) == 0
            }
            TimeUnit::Second => time.second() % step == 0,
            TimeUnit::Minute => time.minute() % step == 0,
            TimeUnit::Hour => time.hour() % step == 0,
            TimeUnit::Day => (time.day() - 1) % step == 0,
            TimeUnit::Week => true,
            TimeUnit::Month => time.month0() % step == 0,
            TimeUnit::Year => time.year().rem_euclid(step as i32) == 0,
        }
    }
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}

fn floor_unit(unit: TimeUnit, time: NaiveDateTime) -> NaiveDateTime {
    let date = time.date();
    match unit {
        TimeUnit::Millisecond => time,
        TimeUnit::Second => time.with_nanosecond(0).unwrap_or(time),
        TimeUnit::Minute => midnight(date)
            + Duration::hours(i64::from(time.hour()))
            + Duration::minutes(i64::from(time.minute())),
        TimeUnit::Hour => midnight(date) + Duration::hours(i64::from(time.hour())),
        TimeUnit::Day => midnight(date),
        TimeUnit::Week => {
            let back = i64::from(date.weekday().num_days_from_sunday());
            midnight(date) - Duration::days(back)
        }
        TimeUnit::Month => midnight(date.with_day(1).unwrap_or(date)),
        TimeUnit::Year => midnight(
            NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        ),
    }
}

fn offset_unit(unit: TimeUnit, time: NaiveDateTime, count: i64) -> NaiveDateTime {
    match unit {
        TimeUnit::Millisecond => time + Duration::milliseconds(count),
        TimeUnit::Second => time + Duration::seconds(count),
        TimeUnit::Minute => time + Duration::minutes(count),
        TimeUnit::Hour => time + Duration::hours(count),
        TimeUnit::Day => time + Duration::days(count),
        TimeUnit::Week => time + Duration::weeks(count),
        TimeUnit::Month => add_months(time, count),
        TimeUnit::Year => add_months(time, count * 12),
    }
}

fn add_months(time: NaiveDateTime, count: i64) -> NaiveDateTime {
    let months = Months::new(count.unsigned_abs().min(u64::from(u32::MAX)) as u32);
    let shifted = if count >= 0 {
        time.checked_add_months(months)
    } else {
        time.checked_sub_months(months)
    };
    shifted.unwrap_or(time)
}

/// d3-style multi-scale label: the coarsest format that still shows what
/// distinguishes `time` from its enclosing boundary.
#[must_use]
pub fn multi_format(time: NaiveDateTime) -> String {
    let format = if floor_unit(TimeUnit::Second, time) < time {
        ".%3f"
    } else if floor_unit(TimeUnit::Minute, time) < time {
        ":%S"
    } else if floor_unit(TimeUnit::Hour, time) < time {
        "%I:%M"
    } else if floor_unit(TimeUnit::Day, time) < time {
        "%I %p"
    } else if floor_unit(TimeUnit::Month, time) < time {
        if floor_unit(TimeUnit::Week, time) < time {
            "%a %d"
        } else {
            "%b %d"
        }
    } else if floor_unit(TimeUnit::Year, time) < time {
        "%B"
    } else {
        "%Y"
    };
    time.format(format).to_string()
}
