//! Row-labelled statement table.

use findash_core::{DashError, Result};
use polars::prelude::*;
use std::collections::HashSet;
use std::fmt;

/// Name of the row label column.
pub const FIELD_COLUMN: &str = "field";

/// One row: the field label and one optional value per period.
pub type Row = (String, Vec<Option<String>>);

/// Financial statement in display shape: one row per field, one column per
/// reporting period.
///
/// Backed by a polars [`DataFrame`] whose first column is [`FIELD_COLUMN`]
/// and whose remaining columns are nullable strings named after the periods,
/// in provider order. Period names are unique and never equal to
/// [`FIELD_COLUMN`].
#[derive(Clone, Debug)]
pub struct StatementTable {
    frame: DataFrame,
}

impl Default for StatementTable {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for StatementTable {
    fn eq(&self, other: &Self) -> bool {
        self.periods() == other.periods() && self.rows() == other.rows()
    }
}

impl StatementTable {
    /// A table with no rows and no periods.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            frame: DataFrame::empty(),
        }
    }

    /// Builds a table from period labels and rows.
    ///
    /// Duplicate period labels get a `_<n>` suffix.
    ///
    /// # Errors
    /// Returns [`DashError::Table`] if a row does not have one value per period.
    pub fn from_rows(periods: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        if let Some((field, values)) = rows.iter().find(|(_, v)| v.len() != periods.len()) {
            return Err(DashError::Table(format!(
                "row {field} has {} values for {} periods",
                values.len(),
                periods.len()
            )));
        }

        let periods = unique_labels(periods);
        let mut columns = Vec::with_capacity(periods.len() + 1);
        columns.push(Column::new(
            FIELD_COLUMN.into(),
            rows.iter().map(|(f, _)| f.as_str()).collect::<Vec<_>>(),
        ));
        for (i, period) in periods.iter().enumerate() {
            let values: Vec<Option<&str>> = rows.iter().map(|(_, v)| v[i].as_deref()).collect();
            columns.push(Column::new(period.as_str().into(), values));
        }

        let frame = DataFrame::new(columns).map_err(|e| DashError::Table(e.to_string()))?;
        Ok(Self { frame })
    }

    /// Row labels, top to bottom.
    #[must_use]
    pub fn fields(&self) -> Vec<String> {
        self.string_column(FIELD_COLUMN)
            .into_iter()
            .flatten()
            .collect()
    }

    /// Period labels, left to right.
    #[must_use]
    pub fn periods(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .filter(|name| name.as_str() != FIELD_COLUMN)
            .map(|name| name.to_string())
            .collect()
    }

    /// Values of the row labelled `field`.
    #[must_use]
    pub fn row(&self, field: &str) -> Option<Vec<Option<String>>> {
        let index = self.fields().iter().position(|f| f == field)?;
        Some(
            self.periods()
                .iter()
                .map(|p| self.string_column(p).get(index).cloned().flatten())
                .collect(),
        )
    }

    /// All rows, top to bottom.
    #[must_use]
    pub fn rows(&self) -> Vec<Row> {
        let columns: Vec<Vec<Option<String>>> = self
            .periods()
            .iter()
            .map(|p| self.string_column(p))
            .collect();

        self.fields()
            .into_iter()
            .enumerate()
            .map(|(i, field)| {
                let values = columns
                    .iter()
                    .map(|c| c.get(i).cloned().flatten())
                    .collect();
                (field, values)
            })
            .collect()
    }

    /// The cell at `field` × `period`.
    #[must_use]
    pub fn value(&self, field: &str, period: &str) -> Option<String> {
        let index = self.fields().iter().position(|f| f == field)?;
        self.string_column(period).get(index).cloned().flatten()
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Number of period columns.
    #[must_use]
    pub fn period_count(&self) -> usize {
        self.periods().len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }

    /// The underlying frame.
    #[must_use]
    pub const fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Consumes the table, returning the underlying frame.
    #[must_use]
    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    fn string_column(&self, name: &str) -> Vec<Option<String>> {
        self.frame
            .column(name)
            .ok()
            .and_then(|c| c.str().ok())
            .map(|ca| ca.into_iter().map(|v| v.map(str::to_string)).collect())
            .unwrap_or_default()
    }
}

impl fmt::Display for StatementTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.frame)
    }
}

/// Makes labels unique and keeps them clear of [`FIELD_COLUMN`].
pub(crate) fn unique_labels(labels: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::from([FIELD_COLUMN.to_string()]);
    labels
        .into_iter()
        .map(|label| {
            let mut candidate = label.clone();
            let mut n = 1;
            while seen.contains(&candidate) {
                candidate = format!("{label}_{n}");
                n += 1;
            }
            seen.insert(candidate.clone());
            candidate
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn test_from_rows_and_accessors() {
        let table = StatementTable::from_rows(
            vec!["2023-12-31".into(), "2022-12-31".into()],
            vec![
                ("totalAssets".into(), vec![s("100"), s("90")]),
                ("goodwill".into(), vec![None, s("5")]),
            ],
        )
        .unwrap();

        assert_eq!(table.height(), 2);
        assert_eq!(table.period_count(), 2);
        assert_eq!(table.fields(), vec!["totalAssets", "goodwill"]);
        assert_eq!(table.periods(), vec!["2023-12-31", "2022-12-31"]);
        assert_eq!(table.row("goodwill"), Some(vec![None, s("5")]));
        assert_eq!(table.value("totalAssets", "2022-12-31"), s("90"));
        assert_eq!(table.row("missing"), None);
        assert_eq!(table.frame().width(), 3);
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let err = StatementTable::from_rows(vec!["a".into()], vec![("x".into(), vec![])]).unwrap_err();
        assert!(matches!(err, DashError::Table(_)));
    }

    #[test]
    fn test_unique_labels() {
        let labels = unique_labels(vec![
            "2023".into(),
            "2023".into(),
            "field".into(),
            "2023".into(),
        ]);
        assert_eq!(labels, vec!["2023", "2023_1", "field_1", "2023_2"]);
    }

    #[test]
    fn test_empty_table() {
        let table = StatementTable::empty();
        assert!(table.is_empty());
        assert!(table.fields().is_empty());
        assert!(table.periods().is_empty());
        assert_eq!(table, StatementTable::default());
    }
}
