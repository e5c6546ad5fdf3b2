//! Named accessors: the only way chart code reads fields out of a datum.
//!
//! Keeping field extraction behind a named accessor centralizes the mapping
//! from raw record fields to semantic values, and lets missing fields surface
//! as `ChartError::MissingField` instead of leaking `NaN` into scale domains.

use std::marker::PhantomData;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::error::{ChartError, ChartResult};

/// Opaque dataset record, as produced by the JSON and CSV loaders.
pub type Record = serde_json::Map<String, Value>;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

pub trait Accessor<D: ?Sized> {
    type Output;

    /// Field name used in error messages and logs.
    fn name(&self) -> &str;

    /// Extracts the value, or `None` when it is missing or malformed.
    fn get(&self, datum: &D) -> Option<Self::Output>;
}

/// Reads a numeric field. Accepts JSON numbers and numeric strings (CSV cells).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccessor {
    field: String,
}

impl FieldAccessor {
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl Accessor<Record> for FieldAccessor {
    type Output = f64;

    fn name(&self) -> &str {
        &self.field
    }

    fn get(&self, datum: &Record) -> Option<f64> {
        let value = match datum.get(&self.field)? {
            Value::Number(number) => number.as_f64()?,
            Value::String(text) => text.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }
}

/// Reads a date or date-time field using a `chrono` format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateAccessor {
    field: String,
    format: String,
}

impl DateAccessor {
    /// Parses `%Y-%m-%d` dates.
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self::with_format(field, DEFAULT_DATE_FORMAT)
    }

    #[must_use]
    pub fn with_format(field: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            format: format.into(),
        }
    }

    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }

    #[must_use]
    pub fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        let text = text.trim();
        NaiveDateTime::parse_from_str(text, &self.format)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(text, &self.format)
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
    }
}

impl Accessor<Record> for DateAccessor {
    type Output = NaiveDateTime;

    fn name(&self) -> &str {
        &self.field
    }

    fn get(&self, datum: &Record) -> Option<NaiveDateTime> {
        match datum.get(&self.field)? {
            Value::String(text) => self.parse(text),
            _ => None,
        }
    }
}

/// Reads a categorical field. Numbers and booleans are stringified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextAccessor {
    field: String,
}

impl TextAccessor {
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl Accessor<Record> for TextAccessor {
    type Output = String;

    fn name(&self) -> &str {
        &self.field
    }

    fn get(&self, datum: &Record) -> Option<String> {
        match datum.get(&self.field)? {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        }
    }
}

/// Wraps a closure as a named accessor for typed datasets.
pub struct FnAccessor<F, T> {
    name: String,
    extract: F,
    _output: PhantomData<fn() -> T>,
}

impl<F, T> FnAccessor<F, T> {
    #[must_use]
    pub fn new(name: impl Into<String>, extract: F) -> Self {
        Self {
            name: name.into(),
            extract,
            _output: PhantomData,
        }
    }
}

impl<F, T> std::fmt::Debug for FnAccessor<F, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnAccessor").field("name", &self.name).finish()
    }
}

impl<D, F, T> Accessor<D> for FnAccessor<F, T>
where
    F: Fn(&D) -> Option<T>,
{
    type Output = T;

    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, datum: &D) -> Option<T> {
        (self.extract)(datum)
    }
}

/// Reads the accessor for every datum, failing on the first missing value.
pub fn require<D, A>(data: &[D], accessor: &A) -> ChartResult<Vec<A::Output>>
where
    A: Accessor<D>,
{
    data.iter()
        .enumerate()
        .map(|(index, datum)| {
            accessor
                .get(datum)
                .ok_or_else(|| ChartError::MissingField {
                    field: accessor.name().to_owned(),
                    index,
                })
        })
        .collect()
}

/// Reads the accessor for every datum, silently skipping missing values.
pub fn collect_defined<D, A>(data: &[D], accessor: &A) -> Vec<A::Output>
where
    A: Accessor<D>,
{
    data.iter().filter_map(|datum| accessor.get(datum)).collect()
}
