use indexmap::IndexMap;

use crate::error::{ChartError, ChartResult};

/// Category to value mapping with a cycled range.
///
/// With an implicit domain (the default), unseen categories are appended to
/// the domain on first use through `apply_or_insert`. `apply` never grows the
/// domain and falls back to the configured `unknown` value.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalScale<V> {
    index: IndexMap<String, usize>,
    range: Vec<V>,
    unknown: Option<V>,
}

impl<V: Clone> OrdinalScale<V> {
    pub fn new(range: Vec<V>) -> ChartResult<Self> {
        if range.is_empty() {
            return Err(ChartError::InvalidData(
                "ordinal scale range must not be empty".to_owned(),
            ));
        }
        Ok(Self {
            index: IndexMap::new(),
            range,
            unknown: None,
        })
    }

    /// Sets the domain explicitly, dropping duplicate categories.
    #[must_use]
    pub fn with_domain<I, S>(mut self, domain: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index.clear();
        for key in domain {
            let next = self.index.len();
            self.index.entry(key.into()).or_insert(next);
        }
        self
    }

    #[must_use]
    pub fn with_unknown(mut self, unknown: V) -> Self {
        self.unknown = Some(unknown);
        self
    }

    pub fn domain(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    #[must_use]
    pub fn range(&self) -> &[V] {
        &self.range
    }

    #[must_use]
    pub fn apply(&self, key: &str) -> Option<V> {
        match self.index.get(key) {
            Some(position) => Some(self.range[position % self.range.len()].clone()),
            None => self.unknown.clone(),
        }
    }

    /// Maps `key`, first appending it to the domain when it is new.
    pub fn apply_or_insert(&mut self, key: &str) -> V {
        let next = self.index.len();
        let position = *self.index.entry(key.to_owned()).or_insert(next);
        self.range[position % self.range.len()].clone()
    }
}
