use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::RowValues;

/// One decoded row: column name to canonical value.
///
/// Columns are kept in name order so that statements generated from a record
/// are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssocRow {
    values: BTreeMap<String, RowValues>,
}

/// An eagerly materialised sequence of rows.
pub type Rows = Vec<AssocRow>;

impl AssocRow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        self.values.insert(column.into(), value.into());
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<RowValues>) {
        self.values.insert(column.into(), value.into());
    }

    pub fn remove(&mut self, column: &str) -> Option<RowValues> {
        self.values.remove(column)
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&RowValues> {
        self.values.get(column)
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Textual rendering of a column; missing columns and NULL both give `""`.
    #[must_use]
    pub fn get_string(&self, column: &str) -> String {
        self.values
            .get(column)
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Integer view of a column, parsing text when needed.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn get_int(&self, column: &str) -> Option<i64> {
        match self.values.get(column)? {
            RowValues::Text(s) => s.trim().parse().ok(),
            RowValues::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            other => other.as_int(),
        }
    }

    /// Float view of a column, parsing text and widening integers when needed.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn get_float(&self, column: &str) -> Option<f64> {
        match self.values.get(column)? {
            RowValues::Float(f) => Some(*f),
            RowValues::Int(i) => Some(*i as f64),
            RowValues::UInt(u) => Some(*u as f64),
            RowValues::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// The row's `id`, when it holds an integer (or integer text).
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.get_int("id")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RowValues)> {
        self.values.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<RowValues>> FromIterator<(K, V)> for AssocRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
