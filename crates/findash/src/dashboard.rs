//! Page loaders for the dashboard.
//!
//! Each loader fetches one provider response and reshapes it for display.
//! Loaders never fail: fetch errors are already degraded by the client, and
//! reshaping errors are logged and replaced by an empty result.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use polars::prelude::DataFrame;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use findash_alphavantage::AlphaVantageClient;
use findash_cache::InMemoryCache;
use findash_core::{DashError, Interval, ReportPeriod, Result, Settings, StatementKind, Symbol};
use findash_normalize::{
    ChartSeries, CleanOptions, SearchMatch, StatementTable, chart_category_series,
    clean_for_chart, company_profile, kpi_frame, search_matches, statement_from_response,
    time_series_frame,
};

/// A dashboard page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Page {
    /// Landing page; loads nothing.
    #[default]
    Home,
    /// Company card.
    CompanyOverview,
    /// Balance sheet table and chart.
    BalanceSheet,
    /// Income statement table and chart.
    IncomeStatement,
    /// Cash flow table and chart.
    CashFlow,
    /// Daily price bars.
    StockQuotes,
    /// Overview ratios.
    Kpi,
}

impl Page {
    /// All pages in navigation order.
    pub const ALL: [Self; 7] = [
        Self::Home,
        Self::CompanyOverview,
        Self::BalanceSheet,
        Self::IncomeStatement,
        Self::CashFlow,
        Self::StockQuotes,
        Self::Kpi,
    ];

    /// Navigation title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::CompanyOverview => "Company Overview",
            Self::BalanceSheet => "Balance Sheet",
            Self::IncomeStatement => "Income Statement",
            Self::CashFlow => "Cash Flow",
            Self::StockQuotes => "Stock Quotes",
            Self::Kpi => "KPI",
        }
    }

    /// Kebab-case name.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::CompanyOverview => "company-overview",
            Self::BalanceSheet => "balance-sheet",
            Self::IncomeStatement => "income-statement",
            Self::CashFlow => "cash-flow",
            Self::StockQuotes => "stock-quotes",
            Self::Kpi => "kpi",
        }
    }

    /// The statement shown on this page, if any.
    #[must_use]
    pub const fn statement(&self) -> Option<StatementKind> {
        match self {
            Self::BalanceSheet => Some(StatementKind::BalanceSheet),
            Self::IncomeStatement => Some(StatementKind::IncomeStatement),
            Self::CashFlow => Some(StatementKind::CashFlow),
            _ => None,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Page {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.title().eq_ignore_ascii_case(s) || p.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| DashError::InvalidParameter(format!("Unknown page: {s}")))
    }
}

/// What a page needs to render.
#[derive(Clone, Debug)]
pub enum PageData {
    /// Nothing to load.
    Home,
    /// Company card entries.
    Overview(Map<String, Value>),
    /// A normalized statement.
    Statement {
        /// Which statement.
        kind: StatementKind,
        /// Field × period table.
        table: StatementTable,
    },
    /// Price bars.
    Quotes(DataFrame),
    /// `label`/`value` ratios.
    Kpis(DataFrame),
}

impl PageData {
    /// Returns true if there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Home => false,
            Self::Overview(map) => map.is_empty(),
            Self::Statement { table, .. } => table.is_empty(),
            Self::Quotes(df) | Self::Kpis(df) => df.height() == 0,
        }
    }
}

/// Page loaders over one [`AlphaVantageClient`].
#[derive(Clone, Debug)]
pub struct Dashboard {
    client: AlphaVantageClient,
    period: ReportPeriod,
    clean: CleanOptions,
}

impl Dashboard {
    /// Create a dashboard over `client`, showing annual statements.
    #[must_use]
    pub fn new(client: AlphaVantageClient) -> Self {
        Self {
            client,
            period: ReportPeriod::default(),
            clean: CleanOptions::default(),
        }
    }

    /// Create a dashboard from the environment, memoizing responses for the
    /// session.
    ///
    /// # Errors
    /// Returns [`DashError::Configuration`] if `ALPHA_VANTAGE_API_KEY` is unset.
    pub fn from_env() -> Result<Self> {
        Self::from_settings(&Settings::from_env(), None)
    }

    /// Create a dashboard from settings, memoizing responses for the session.
    ///
    /// # Errors
    /// Returns [`DashError::Configuration`] if no credential is available.
    pub fn from_settings(settings: &Settings, api_key: Option<&str>) -> Result<Self> {
        let client = AlphaVantageClient::from_settings(settings, api_key)?
            .with_cache(Arc::new(InMemoryCache::new()));
        Ok(Self::new(client))
    }

    /// Show quarterly or annual statements.
    #[must_use]
    pub const fn with_period(mut self, period: ReportPeriod) -> Self {
        self.period = period;
        self
    }

    /// Replace the chart cleaning options.
    #[must_use]
    pub fn with_clean_options(mut self, clean: CleanOptions) -> Self {
        self.clean = clean;
        self
    }

    /// The underlying client.
    #[must_use]
    pub const fn client(&self) -> &AlphaVantageClient {
        &self.client
    }

    /// The statement period shown.
    #[must_use]
    pub const fn period(&self) -> ReportPeriod {
        self.period
    }

    /// Loads everything `page` shows.
    pub async fn load(&self, page: Page, symbol: &str) -> PageData {
        debug!(page = %page, symbol, "Loading page");
        match page {
            Page::Home => PageData::Home,
            Page::CompanyOverview => PageData::Overview(self.company_info(symbol).await),
            Page::BalanceSheet | Page::IncomeStatement | Page::CashFlow => {
                let kind = page.statement().unwrap_or(StatementKind::BalanceSheet);
                PageData::Statement {
                    kind,
                    table: self.statement(kind, symbol).await,
                }
            }
            Page::StockQuotes => PageData::Quotes(self.quotes(symbol, Interval::Daily).await),
            Page::Kpi => PageData::Kpis(self.kpis(symbol).await),
        }
    }

    /// Company card entries.
    pub async fn company_info(&self, symbol: &str) -> Map<String, Value> {
        let symbol = Symbol::new(symbol);
        company_profile(&self.client.overview(symbol.as_str()).await)
    }

    /// A statement as a field × period table.
    pub async fn statement(&self, kind: StatementKind, symbol: &str) -> StatementTable {
        let symbol = Symbol::new(symbol);
        let response = self.client.statement(kind, symbol.as_str()).await;
        or_empty(kind.title(), &symbol, statement_from_response(&response, self.period))
    }

    /// Balance sheet table.
    pub async fn balance_sheet(&self, symbol: &str) -> StatementTable {
        self.statement(StatementKind::BalanceSheet, symbol).await
    }

    /// Income statement table.
    pub async fn income_statement(&self, symbol: &str) -> StatementTable {
        self.statement(StatementKind::IncomeStatement, symbol).await
    }

    /// Cash flow table.
    pub async fn cash_flow(&self, symbol: &str) -> StatementTable {
        self.statement(StatementKind::CashFlow, symbol).await
    }

    /// A statement cleaned for charting.
    pub async fn chart_table(&self, kind: StatementKind, symbol: &str) -> StatementTable {
        let table = self.statement(kind, symbol).await;
        or_empty(kind.title(), &Symbol::new(symbol), clean_for_chart(&table, &self.clean))
    }

    /// One statement row, ready to plot.
    ///
    /// # Errors
    /// Returns [`DashError::CategoryNotFound`] if the cleaned statement has no
    /// row labelled `category`.
    pub async fn chart_series(
        &self,
        kind: StatementKind,
        symbol: &str,
        category: &str,
    ) -> Result<ChartSeries> {
        chart_category_series(&self.chart_table(kind, symbol).await, category)
    }

    /// Price bars at `interval`.
    pub async fn quotes(&self, symbol: &str, interval: Interval) -> DataFrame {
        let symbol = Symbol::new(symbol);
        let response = self.client.time_series(symbol.as_str(), interval, false).await;
        or_empty("quotes", &symbol, time_series_frame(&response, interval))
    }

    /// Overview ratios as `label`/`value` rows.
    pub async fn kpis(&self, symbol: &str) -> DataFrame {
        let symbol = Symbol::new(symbol);
        let response = self.client.overview(symbol.as_str()).await;
        or_empty("kpis", &symbol, kpi_frame(&response))
    }

    /// Tickers matching `keywords`.
    pub async fn search(&self, keywords: &str) -> Vec<SearchMatch> {
        search_matches(&self.client.search(keywords).await)
    }
}

fn or_empty<T: Default>(what: &str, symbol: &Symbol, result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        warn!(what, symbol = %symbol, error = %e, "Could not reshape response, showing nothing");
        T::default()
    })
}
