//! Chart preparation: sentinel cleanup and single-category series.

use findash_core::{DashError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::table::{Row, StatementTable};

/// Rows removed before charting by default.
pub const DEFAULT_DROP_LABELS: &[&str] = &["reportedCurrency"];

/// Placeholder the provider sends for "no data".
pub const NONE_SENTINEL: &str = "None";

/// Options for [`clean_for_chart`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CleanOptions {
    /// Row labels that are removed outright.
    pub drop_labels: Vec<String>,
    /// Also treat an exact `"0"` as missing.
    pub zero_is_missing: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            drop_labels: DEFAULT_DROP_LABELS.iter().map(ToString::to_string).collect(),
            zero_is_missing: false,
        }
    }
}

impl CleanOptions {
    /// Sets whether `"0"` counts as missing.
    #[must_use]
    pub const fn with_zero_is_missing(mut self, zero_is_missing: bool) -> Self {
        self.zero_is_missing = zero_is_missing;
        self
    }

    /// Replaces the labels to drop.
    #[must_use]
    pub fn with_drop_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drop_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Returns true if `value` means "no data".
    #[must_use]
    pub fn is_sentinel(&self, value: &str) -> bool {
        let value = value.trim();
        value.is_empty() || value == NONE_SENTINEL || (self.zero_is_missing && value == "0")
    }
}

/// Prepares a statement table for charting.
///
/// Drops the rows in `options.drop_labels`, turns sentinel cells into missing
/// ones and removes rows that are missing in every period. A table without
/// periods therefore loses all its rows. Running it twice changes nothing.
///
/// # Errors
/// Returns [`DashError::Table`] if the cleaned frame cannot be built.
pub fn clean_for_chart(table: &StatementTable, options: &CleanOptions) -> Result<StatementTable> {
    let before = table.height();
    let rows: Vec<Row> = table
        .rows()
        .into_iter()
        .filter(|(field, _)| !options.drop_labels.iter().any(|l| l == field))
        .map(|(field, values)| {
            let values: Vec<Option<String>> = values
                .into_iter()
                .map(|v| v.filter(|v| !options.is_sentinel(v)))
                .collect();
            (field, values)
        })
        .filter(|(_, values)| values.iter().any(Option::is_some))
        .collect();

    debug!(before, after = rows.len(), "Cleaned table for charting");
    StatementTable::from_rows(table.periods(), rows)
}

/// One period of a [`ChartSeries`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Period label.
    pub period: String,
    /// Cell text as found in the table.
    pub raw: Option<String>,
    /// Numeric value, if the cell parses as a number.
    pub value: Option<f64>,
}

/// The values of one row, ready to plot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Row label.
    pub category: String,
    /// One point per period, in column order.
    pub points: Vec<SeriesPoint>,
}

impl ChartSeries {
    /// Period labels.
    #[must_use]
    pub fn periods(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.period.as_str()).collect()
    }

    /// Numeric values.
    #[must_use]
    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if there are no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Extracts the row labelled `category`.
///
/// # Errors
/// Returns [`DashError::CategoryNotFound`] if no row has that label.
pub fn chart_category_series(table: &StatementTable, category: &str) -> Result<ChartSeries> {
    let values = table
        .row(category)
        .ok_or_else(|| DashError::CategoryNotFound(category.to_string()))?;

    let points = table
        .periods()
        .into_iter()
        .zip(values)
        .map(|(period, raw)| SeriesPoint {
            value: raw.as_deref().and_then(|r| r.trim().parse().ok()),
            period,
            raw,
        })
        .collect();

    Ok(ChartSeries {
        category: category.to_string(),
        points,
    })
}
