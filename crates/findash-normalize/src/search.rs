//! Symbol search results.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// One `bestMatches` entry of a symbol search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    /// Ticker.
    #[serde(rename = "1. symbol")]
    pub symbol: String,
    /// Security name.
    #[serde(rename = "2. name", default)]
    pub name: String,
    /// Security type, e.g. `Equity`.
    #[serde(rename = "3. type", default)]
    pub kind: String,
    /// Listing region.
    #[serde(rename = "4. region", default)]
    pub region: String,
    /// Local market open time.
    #[serde(rename = "5. marketOpen", default)]
    pub market_open: String,
    /// Local market close time.
    #[serde(rename = "6. marketClose", default)]
    pub market_close: String,
    /// Market time zone.
    #[serde(rename = "7. timezone", default)]
    pub timezone: String,
    /// Trading currency.
    #[serde(rename = "8. currency", default)]
    pub currency: String,
    /// Relevance between 0 and 1, as sent.
    #[serde(rename = "9. matchScore", default)]
    pub match_score: String,
}

impl SearchMatch {
    /// Relevance as a number.
    #[must_use]
    pub fn score(&self) -> Option<f64> {
        self.match_score.parse().ok()
    }
}

/// Typed `bestMatches` of a search response. Malformed entries are skipped.
#[must_use]
pub fn search_matches(response: &Value) -> Vec<SearchMatch> {
    response
        .get("bestMatches")
        .and_then(Value::as_array)
        .map(|matches| {
            matches
                .iter()
                .filter_map(|m| match SearchMatch::deserialize(m) {
                    Ok(found) => Some(found),
                    Err(e) => {
                        warn!(error = %e, "Skipping malformed search match");
                        None
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}
