//! Company overview reshaping: profile card and KPI table.

use findash_core::{DashError, Result};
use polars::prelude::*;
use serde_json::{Map, Value};

/// Overview keys shown on the company card.
pub const BASIC_INFO_KEYS: &[&str] = &[
    "Exchange",
    "Currency",
    "Country",
    "Sector",
    "Technology",
    "Industry",
    "Address",
    "FullTimeEmployees",
    "MarketCapitalization",
];

/// Identity keys that are neither profile details nor KPIs.
pub const IDENTITY_KEYS: &[&str] = &[
    "Symbol",
    "AssetType",
    "Description",
    "Name",
    "FiscalYearEnd",
    "LatestQuarter",
];

/// Keys kept by [`company_profile`] besides [`BASIC_INFO_KEYS`].
pub const PROFILE_EXTRA_KEYS: &[&str] = &["Name", "Description"];

/// The overview entries shown on the company card, in provider order.
#[must_use]
pub fn company_profile(overview: &Value) -> Map<String, Value> {
    overview
        .as_object()
        .map(|o| {
            o.iter()
                .filter(|(k, _)| BASIC_INFO_KEYS.contains(&k.as_str()) || PROFILE_EXTRA_KEYS.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
        .unwrap_or_default()
}

/// Every remaining overview entry as a `label`/`value` frame.
///
/// # Errors
/// Returns [`DashError::Table`] if the frame cannot be built.
pub fn kpi_frame(overview: &Value) -> Result<DataFrame> {
    let (labels, values): (Vec<String>, Vec<Option<String>>) = overview
        .as_object()
        .into_iter()
        .flatten()
        .filter(|(k, _)| !BASIC_INFO_KEYS.contains(&k.as_str()) && !IDENTITY_KEYS.contains(&k.as_str()))
        .map(|(k, v)| {
            let value = match v {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            };
            (k.clone(), value)
        })
        .unzip();

    DataFrame::new(vec![
        Column::new("label".into(), labels),
        Column::new("value".into(), values),
    ])
    .map_err(|e| DashError::Table(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn overview() -> Value {
        json!({
            "Symbol": "IBM",
            "AssetType": "Common Stock",
            "Name": "International Business Machines",
            "Description": "IBM is an American multinational technology company.",
            "Exchange": "NYSE",
            "Currency": "USD",
            "Sector": "TECHNOLOGY",
            "FiscalYearEnd": "December",
            "LatestQuarter": "2024-03-31",
            "MarketCapitalization": "175000000000",
            "PERatio": "21.5",
            "EPS": "8.14",
            "DividendYield": "0.0354"
        })
    }

    #[test]
    fn test_company_profile_keeps_card_keys_in_order() {
        let profile = company_profile(&overview());
        let keys: Vec<&str> = profile.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["Name", "Description", "Exchange", "Currency", "Sector", "MarketCapitalization"]
        );
        assert!(company_profile(&json!([])).is_empty());
    }

    #[test]
    fn test_kpi_frame() {
        let df = kpi_frame(&overview()).unwrap();
        assert_eq!(df.height(), 3);

        let labels = df.column("label").unwrap().str().unwrap();
        assert_eq!(labels.get(0), Some("PERatio"));
        assert_eq!(labels.get(2), Some("DividendYield"));
        let values = df.column("value").unwrap().str().unwrap();
        assert_eq!(values.get(1), Some("8.14"));
    }

    #[test]
    fn test_kpi_frame_of_empty_overview() {
        let df = kpi_frame(&json!({})).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 2);
    }
}
