//! Provider endpoints and their parameter contracts.
//!
//! [`Endpoint`] is the closed set of report types the dashboard can request.
//! [`ENDPOINTS`] is the declarative table that maps each one to its wire name,
//! a friendly name, and the parameters it accepts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DashError;

/// A provider report/query type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Endpoint {
    /// Company overview and headline ratios.
    Overview,
    /// Balance sheet reports.
    BalanceSheet,
    /// Income statement reports.
    IncomeStatement,
    /// Cash flow reports.
    CashFlow,
    /// Ticker search by keywords.
    SymbolSearch,
    /// Daily OHLCV bars.
    TimeSeriesDaily,
    /// Weekly OHLCV bars.
    TimeSeriesWeekly,
    /// Monthly OHLCV bars.
    TimeSeriesMonthly,
    /// Reported and estimated earnings per share.
    Earnings,
    /// News articles with sentiment scores.
    NewsSentiment,
    /// Top gainers, losers and most active tickers.
    TopGainersLosers,
}

/// Parameter contract of one endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EndpointSpec {
    /// The endpoint described by this entry.
    pub endpoint: Endpoint,
    /// Value of the `function` query parameter.
    pub function: &'static str,
    /// Friendly snake_case name.
    pub name: &'static str,
    /// Whether a `symbol` must be supplied.
    pub requires_symbol: bool,
    /// Parameters that must be present.
    pub required: &'static [&'static str],
    /// Parameters the provider understands besides the required ones.
    pub optional: &'static [&'static str],
}

impl EndpointSpec {
    /// Returns true if `param` is part of this endpoint's contract.
    #[must_use]
    pub fn accepts(&self, param: &str) -> bool {
        self.required.contains(&param) || self.optional.contains(&param)
    }
}

/// Endpoint table, indexed by the [`Endpoint`] discriminant.
pub const ENDPOINTS: &[EndpointSpec] = &[
    EndpointSpec {
        endpoint: Endpoint::Overview,
        function: "OVERVIEW",
        name: "overview",
        requires_symbol: true,
        required: &[],
        optional: &[],
    },
    EndpointSpec {
        endpoint: Endpoint::BalanceSheet,
        function: "BALANCE_SHEET",
        name: "balance_sheet",
        requires_symbol: true,
        required: &[],
        optional: &[],
    },
    EndpointSpec {
        endpoint: Endpoint::IncomeStatement,
        function: "INCOME_STATEMENT",
        name: "income_statement",
        requires_symbol: true,
        required: &[],
        optional: &[],
    },
    EndpointSpec {
        endpoint: Endpoint::CashFlow,
        function: "CASH_FLOW",
        name: "cash_flow",
        requires_symbol: true,
        required: &[],
        optional: &[],
    },
    EndpointSpec {
        endpoint: Endpoint::SymbolSearch,
        function: "SYMBOL_SEARCH",
        name: "search",
        requires_symbol: false,
        required: &["keywords"],
        optional: &["datatype"],
    },
    EndpointSpec {
        endpoint: Endpoint::TimeSeriesDaily,
        function: "TIME_SERIES_DAILY",
        name: "daily_time_series",
        requires_symbol: true,
        required: &[],
        optional: &["outputsize", "datatype"],
    },
    EndpointSpec {
        endpoint: Endpoint::TimeSeriesWeekly,
        function: "TIME_SERIES_WEEKLY",
        name: "weekly_time_series",
        requires_symbol: true,
        required: &[],
        optional: &["datatype"],
    },
    EndpointSpec {
        endpoint: Endpoint::TimeSeriesMonthly,
        function: "TIME_SERIES_MONTHLY",
        name: "monthly_time_series",
        requires_symbol: true,
        required: &[],
        optional: &["datatype"],
    },
    EndpointSpec {
        endpoint: Endpoint::Earnings,
        function: "EARNINGS",
        name: "earnings",
        requires_symbol: true,
        required: &[],
        optional: &[],
    },
    EndpointSpec {
        endpoint: Endpoint::NewsSentiment,
        function: "NEWS_SENTIMENT",
        name: "market_news_sentiment",
        requires_symbol: false,
        required: &[],
        optional: &["tickers", "topics", "time_from", "time_to", "sort", "limit"],
    },
    EndpointSpec {
        endpoint: Endpoint::TopGainersLosers,
        function: "TOP_GAINERS_LOSERS",
        name: "top_gainers_losers",
        requires_symbol: false,
        required: &[],
        optional: &[],
    },
];

impl Endpoint {
    /// Every endpoint, in table order.
    pub const ALL: [Self; 11] = [
        Self::Overview,
        Self::BalanceSheet,
        Self::IncomeStatement,
        Self::CashFlow,
        Self::SymbolSearch,
        Self::TimeSeriesDaily,
        Self::TimeSeriesWeekly,
        Self::TimeSeriesMonthly,
        Self::Earnings,
        Self::NewsSentiment,
        Self::TopGainersLosers,
    ];

    /// The table entry for this endpoint.
    #[must_use]
    pub const fn spec(self) -> &'static EndpointSpec {
        &ENDPOINTS[self as usize]
    }

    /// Value of the `function` query parameter.
    #[must_use]
    pub const fn function(self) -> &'static str {
        self.spec().function
    }

    /// Friendly snake_case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.spec().name
    }

    /// Look up an endpoint by friendly name or wire name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        ENDPOINTS
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name) || s.function.eq_ignore_ascii_case(name))
            .map(|s| s.endpoint)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.function())
    }
}

impl FromStr for Endpoint {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| DashError::InvalidParameter(format!("Unknown endpoint: {s}")))
    }
}

/// The three financial statements a company files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    /// Balance sheet.
    BalanceSheet,
    /// Income statement.
    IncomeStatement,
    /// Cash flow statement.
    CashFlow,
}

impl StatementKind {
    /// All statements in dashboard order.
    pub const ALL: [Self; 3] = [Self::BalanceSheet, Self::IncomeStatement, Self::CashFlow];

    /// The endpoint serving this statement.
    #[must_use]
    pub const fn endpoint(&self) -> Endpoint {
        match self {
            Self::BalanceSheet => Endpoint::BalanceSheet,
            Self::IncomeStatement => Endpoint::IncomeStatement,
            Self::CashFlow => Endpoint::CashFlow,
        }
    }

    /// Human readable title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::BalanceSheet => "Balance Sheet",
            Self::IncomeStatement => "Income Statement",
            Self::CashFlow => "Cash Flow",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_table_is_indexed_by_discriminant() {
        assert_eq!(ENDPOINTS.len(), Endpoint::ALL.len());
        for endpoint in Endpoint::ALL {
            assert_eq!(endpoint.spec().endpoint, endpoint);
        }
    }

    #[rstest]
    #[case("balance_sheet", Endpoint::BalanceSheet)]
    #[case("BALANCE_SHEET", Endpoint::BalanceSheet)]
    #[case("search", Endpoint::SymbolSearch)]
    #[case("daily_time_series", Endpoint::TimeSeriesDaily)]
    #[case("news_sentiment", Endpoint::NewsSentiment)]
    #[case("market_news_sentiment", Endpoint::NewsSentiment)]
    fn test_lookup_by_name(#[case] name: &str, #[case] expected: Endpoint) {
        assert_eq!(name.parse::<Endpoint>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_endpoint() {
        let err = "DIVIDENDS".parse::<Endpoint>().unwrap_err();
        assert!(matches!(err, DashError::InvalidParameter(_)));
    }

    #[test]
    fn test_display_is_wire_name() {
        assert_eq!(Endpoint::TopGainersLosers.to_string(), "TOP_GAINERS_LOSERS");
        assert_eq!(
            serde_json::to_string(&Endpoint::CashFlow).unwrap(),
            "\"CASH_FLOW\""
        );
    }

    #[test]
    fn test_search_contract() {
        let spec = Endpoint::SymbolSearch.spec();
        assert!(!spec.requires_symbol);
        assert!(spec.accepts("keywords"));
        assert!(!spec.accepts("symbol"));
    }

    #[test]
    fn test_statement_endpoints() {
        let endpoints: Vec<Endpoint> = StatementKind::ALL.iter().map(|k| k.endpoint()).collect();
        assert_eq!(
            endpoints,
            vec![Endpoint::BalanceSheet, Endpoint::IncomeStatement, Endpoint::CashFlow]
        );
    }
}
