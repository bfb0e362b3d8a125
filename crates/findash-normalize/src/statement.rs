//! Statement normalization.
//!
//! Turns a list of period reports, each a flat JSON object, into a
//! [`StatementTable`]: the period label field becomes the column headers and
//! every other field becomes a row.

use findash_core::{ReportPeriod, Result};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::table::{Row, StatementTable};

/// Field holding the period label of a report.
pub const PERIOD_HEADER: &str = "fiscalDateEnding";

/// Separator used when flattening nested objects.
pub const NESTED_SEPARATOR: &str = ".";

/// The reports list of a statement response for `period`.
///
/// A missing key or a value of the wrong shape yields an empty slice.
#[must_use]
pub fn reports_from_response(response: &Value, period: ReportPeriod) -> &[Value] {
    match response.get(period.reports_key()).and_then(Value::as_array) {
        Some(reports) => reports.as_slice(),
        None => {
            if response.as_object().is_some_and(|o| !o.is_empty()) {
                warn!(key = period.reports_key(), "Statement response has no reports list");
            }
            &[]
        }
    }
}

/// Reshapes period reports into a field × period table.
///
/// Nested objects are flattened with `.` separators. The row order is the
/// order in which fields first appear across the reports; the column order is
/// the report order. The header field is [`PERIOD_HEADER`] when any report has
/// it, otherwise the first field. Reports without a header value are labelled
/// `period_<i>`. Numbers and booleans are stringified and nulls become
/// missing cells.
///
/// # Errors
/// Returns [`DashError::Table`](findash_core::DashError::Table) if the frame
/// cannot be built.
pub fn normalize_statement(reports: &[Value]) -> Result<StatementTable> {
    let records: Vec<Map<String, Value>> = reports
        .iter()
        .enumerate()
        .map(|(i, report)| {
            let mut record = Map::new();
            match report.as_object() {
                Some(object) => flatten_into("", object, &mut record),
                None => warn!(index = i, "Skipping report that is not an object"),
            }
            record
        })
        .collect();

    let mut seen = HashSet::new();
    let fields: Vec<&String> = records
        .iter()
        .flat_map(Map::keys)
        .filter(|k| seen.insert(k.as_str()))
        .collect();

    let Some(header) = fields
        .iter()
        .find(|f| f.as_str() == PERIOD_HEADER)
        .or_else(|| fields.first())
        .map(|f| f.as_str())
    else {
        return Ok(StatementTable::empty());
    };

    let periods: Vec<String> = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            record
                .get(header)
                .and_then(cell)
                .filter(|label| !label.trim().is_empty())
                .unwrap_or_else(|| format!("period_{i}"))
        })
        .collect();

    let rows: Vec<Row> = fields
        .iter()
        .filter(|f| f.as_str() != header)
        .map(|field| {
            let values = records
                .iter()
                .map(|r| r.get(field.as_str()).and_then(cell))
                .collect();
            ((*field).clone(), values)
        })
        .collect();

    debug!(rows = rows.len(), periods = periods.len(), header, "Normalized statement");
    StatementTable::from_rows(periods, rows)
}

/// Extracts and normalizes the `period` reports of a statement response.
///
/// # Errors
/// Returns [`DashError::Table`](findash_core::DashError::Table) if the frame
/// cannot be built.
pub fn statement_from_response(response: &Value, period: ReportPeriod) -> Result<StatementTable> {
    normalize_statement(reports_from_response(response, period))
}

fn flatten_into(prefix: &str, object: &Map<String, Value>, out: &mut Map<String, Value>) {
    for (key, value) in object {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}{NESTED_SEPARATOR}{key}")
        };
        match value {
            Value::Object(inner) if !inner.is_empty() => flatten_into(&name, inner, out),
            Value::Object(_) => {
                out.insert(name, Value::Null);
            }
            other => {
                out.insert(name, other.clone());
            }
        }
    }
}

/// Cell text of a JSON value.
fn cell(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
