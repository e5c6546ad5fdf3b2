use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("field `{field}` is missing or not a valid value at index {index}")]
    MissingField { field: String, index: usize },

    #[error(transparent)]
    DataLoad(#[from] DataLoadError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Failures while reading a dataset from disk or a reader.
///
/// `origin` is the file path when known, `<reader>` otherwise.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to read {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON from {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse CSV from {origin}: {source}")]
    Csv {
        origin: String,
        #[source]
        source: csv::Error,
    },
}

/// Domains that cannot back a scale, a binning pass or a layout.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("{name} domain is empty")]
    Empty { name: String },

    #[error("{name} domain must be finite")]
    NonFinite { name: String },

    #[error("{name} domain must be strictly monotonic")]
    NotMonotonic { name: String },

    #[error("{name} domain has {domain} stops but range has {range}")]
    StopCountMismatch {
        name: String,
        domain: usize,
        range: usize,
    },

    #[error("{name} domain collapses to the single value {value}")]
    Degenerate { name: String, value: f64 },
}

impl DomainError {
    pub(crate) fn empty(name: &str) -> Self {
        Self::Empty {
            name: name.to_owned(),
        }
    }

    pub(crate) fn non_finite(name: &str) -> Self {
        Self::NonFinite {
            name: name.to_owned(),
        }
    }

    pub(crate) fn not_monotonic(name: &str) -> Self {
        Self::NotMonotonic {
            name: name.to_owned(),
        }
    }
}
