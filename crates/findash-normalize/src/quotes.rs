//! Price bars as a polars frame.

use chrono::{Datelike, NaiveDate};
use findash_core::{DashError, Interval, Result};
use polars::prelude::*;
use serde_json::Value;
use tracing::warn;

/// Days between 0001-01-01 and the Unix epoch; polars dates count from the epoch.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Price columns, in frame order.
pub const PRICE_COLUMNS: [&str; 5] = ["open", "high", "low", "close", "volume"];

/// Strips the `"1. "` style ordinal the provider puts in front of bar keys.
fn bar_key(key: &str) -> &str {
    key.split_once(". ").map_or(key, |(_, name)| name)
}

/// Converts a time series response into a frame sorted by date.
///
/// Columns: `date` (Date), `open`, `high`, `low`, `close`, `volume` (f64).
/// Unparseable dates are skipped; unparseable prices become nulls. A response
/// without the series key yields an empty frame.
///
/// # Errors
/// Returns [`DashError::Table`] if the frame cannot be built.
pub fn time_series_frame(response: &Value, interval: Interval) -> Result<DataFrame> {
    let Some(series) = response.get(interval.series_key()).and_then(Value::as_object) else {
        if response.as_object().is_some_and(|o| !o.is_empty()) {
            warn!(key = interval.series_key(), "Time series response has no bars");
        }
        return Ok(DataFrame::empty());
    };

    let mut dates: Vec<i32> = Vec::with_capacity(series.len());
    let mut prices: Vec<Vec<Option<f64>>> = vec![Vec::with_capacity(series.len()); PRICE_COLUMNS.len()];

    for (date, bar) in series {
        let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
            warn!(date = %date, "Skipping bar with unparseable date");
            continue;
        };
        dates.push(parsed.num_days_from_ce() - EPOCH_DAYS_FROM_CE);

        for (i, column) in PRICE_COLUMNS.iter().enumerate() {
            let value = bar
                .as_object()
                .and_then(|b| b.iter().find(|(k, _)| bar_key(k) == *column))
                .and_then(|(_, v)| match v {
                    Value::String(s) => s.trim().parse().ok(),
                    other => other.as_f64(),
                });
            prices[i].push(value);
        }
    }

    let mut columns = vec![Column::new("date".into(), dates)];
    for (name, values) in PRICE_COLUMNS.iter().zip(prices) {
        columns.push(Column::new((*name).into(), values));
    }

    let df = DataFrame::new(columns).map_err(|e| DashError::Table(e.to_string()))?;

    df.lazy()
        .with_column(col("date").cast(DataType::Date))
        .sort(["date"], Default::default())
        .collect()
        .map_err(|e| DashError::Table(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn daily() -> Value {
        json!({
            "Meta Data": {"2. Symbol": "IBM"},
            "Time Series (Daily)": {
                "2024-01-03": {"1. open": "161.00", "2. high": "161.73", "3. low": "160.08", "4. close": "160.10", "5. volume": "4086131"},
                "2024-01-02": {"1. open": "162.83", "2. high": "163.29", "3. low": "160.38", "4. close": "160.97", "5. volume": "3545934"},
                "not-a-date": {"1. open": "1"}
            }
        })
    }

    #[test]
    fn test_daily_frame_is_sorted() {
        let df = time_series_frame(&daily(), Interval::Daily).unwrap();

        assert_eq!(df.height(), 2);
        let names: Vec<&str> = df.get_column_names().iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["date", "open", "high", "low", "close", "volume"]);
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);

        let open = df.column("open").unwrap().f64().unwrap();
        assert_eq!(open.get(0), Some(162.83));
        assert_eq!(open.get(1), Some(161.00));
        let volume = df.column("volume").unwrap().f64().unwrap();
        assert_eq!(volume.get(1), Some(4_086_131.0));
    }

    #[test]
    fn test_missing_series_key() {
        let df = time_series_frame(&daily(), Interval::Weekly).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(time_series_frame(&json!({}), Interval::Daily).unwrap().height(), 0);
    }

    #[test]
    fn test_bar_key() {
        assert_eq!(bar_key("1. open"), "open");
        assert_eq!(bar_key("close"), "close");
    }
}
