//! End-to-end page loading against a scripted provider.

use std::sync::Arc;
use std::time::Duration;

use findash::{
    AlphaVantageClient, Credential, DashError, Dashboard, HttpResponse, InMemoryCache, Interval,
    Page, PageData, ReportPeriod, RetryPolicy, ScriptedTransport, StatementKind,
};
use serde_json::{Value, json};

fn overview() -> Value {
    json!({
        "Symbol": "IBM",
        "AssetType": "Common Stock",
        "Name": "International Business Machines",
        "Description": "Technology company.",
        "Exchange": "NYSE",
        "Currency": "USD",
        "Country": "USA",
        "Sector": "TECHNOLOGY",
        "Industry": "COMPUTER & OFFICE EQUIPMENT",
        "FiscalYearEnd": "December",
        "LatestQuarter": "2024-03-31",
        "MarketCapitalization": "175000000000",
        "PERatio": "21.5",
        "EPS": "8.14"
    })
}

fn balance_sheet() -> Value {
    json!({
        "symbol": "IBM",
        "annualReports": [
            {"fiscalDateEnding": "2023-12-31", "reportedCurrency": "USD", "totalAssets": "135241000000", "goodwill": "None", "treasuryStock": "0"},
            {"fiscalDateEnding": "2022-12-31", "reportedCurrency": "USD", "totalAssets": "127243000000", "goodwill": "None", "treasuryStock": "0"}
        ],
        "quarterlyReports": [
            {"fiscalDateEnding": "2024-03-31", "reportedCurrency": "USD", "totalAssets": "137169000000"}
        ]
    })
}

fn daily() -> Value {
    json!({
        "Meta Data": {"2. Symbol": "IBM"},
        "Time Series (Daily)": {
            "2024-01-03": {"1. open": "161.00", "2. high": "161.73", "3. low": "160.08", "4. close": "160.10", "5. volume": "4086131"},
            "2024-01-02": {"1. open": "162.83", "2. high": "163.29", "3. low": "160.38", "4. close": "160.97", "5. volume": "3545934"}
        }
    })
}

fn transport() -> Arc<ScriptedTransport> {
    Arc::new(
        ScriptedTransport::new()
            .route("OVERVIEW", [HttpResponse::json(&overview())])
            .route("BALANCE_SHEET", [HttpResponse::json(&balance_sheet())])
            .route("INCOME_STATEMENT", [HttpResponse::status(404)])
            .route("TIME_SERIES_DAILY", [HttpResponse::json(&daily())])
            .route(
                "SYMBOL_SEARCH",
                [HttpResponse::json(&json!({"bestMatches": [{"1. symbol": "IBM", "2. name": "IBM"}]}))],
            ),
    )
}

fn dashboard(transport: &Arc<ScriptedTransport>) -> Dashboard {
    let client = AlphaVantageClient::with_transport(transport.clone(), Credential::new("demo").unwrap())
        .with_retry_policy(RetryPolicy::default().with_backoff_factor(Duration::ZERO))
        .with_cache(Arc::new(InMemoryCache::new()));
    Dashboard::new(client)
}

#[tokio::test]
async fn test_overview_and_kpi_pages_share_one_fetch() {
    let transport = transport();
    let dashboard = dashboard(&transport);

    let PageData::Overview(card) = dashboard.load(Page::CompanyOverview, "ibm").await else {
        panic!("expected overview data");
    };
    assert_eq!(card.get("Name"), Some(&json!("International Business Machines")));
    assert!(!card.contains_key("PERatio"));

    let PageData::Kpis(kpis) = dashboard.load(Page::Kpi, "IBM").await else {
        panic!("expected kpi data");
    };
    assert_eq!(kpis.height(), 2);

    assert_eq!(transport.calls(), 1);
    assert_eq!(transport.last_query().unwrap().get("symbol"), Some("IBM"));
}

#[tokio::test]
async fn test_statement_page() {
    let transport = transport();
    let dashboard = dashboard(&transport);

    let PageData::Statement { kind, table } = dashboard.load(Page::BalanceSheet, "IBM").await else {
        panic!("expected statement data");
    };
    assert_eq!(kind, StatementKind::BalanceSheet);
    assert_eq!(table.periods(), vec!["2023-12-31", "2022-12-31"]);
    assert_eq!(
        table.fields(),
        vec!["reportedCurrency", "totalAssets", "goodwill", "treasuryStock"]
    );

    let quarterly = dashboard.clone().with_period(ReportPeriod::Quarterly);
    let table = quarterly.balance_sheet("IBM").await;
    assert_eq!(table.periods(), vec!["2024-03-31"]);
}

#[tokio::test]
async fn test_chart_series() {
    let transport = transport();
    let dashboard = dashboard(&transport);

    let chart = dashboard.chart_table(StatementKind::BalanceSheet, "IBM").await;
    assert_eq!(chart.fields(), vec!["totalAssets", "treasuryStock"]);

    let series = dashboard
        .chart_series(StatementKind::BalanceSheet, "IBM", "totalAssets")
        .await
        .unwrap();
    assert_eq!(series.values(), vec![Some(135_241_000_000.0), Some(127_243_000_000.0)]);

    let err = dashboard
        .chart_series(StatementKind::BalanceSheet, "IBM", "goodwill")
        .await
        .unwrap_err();
    assert!(matches!(err, DashError::CategoryNotFound(_)));
}

#[tokio::test]
async fn test_failed_fetch_renders_empty_page() {
    let transport = transport();
    let dashboard = dashboard(&transport);

    let data = dashboard.load(Page::IncomeStatement, "IBM").await;
    assert!(data.is_empty());
    assert!(dashboard.cash_flow("IBM").await.is_empty());
}

#[tokio::test]
async fn test_quotes_and_search() {
    let transport = transport();
    let dashboard = dashboard(&transport);

    let bars = dashboard.quotes("IBM", Interval::Daily).await;
    assert_eq!(bars.height(), 2);
    assert_eq!(transport.last_query().unwrap().get("outputsize"), Some("compact"));

    let matches = dashboard.search("international business").await;
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].symbol, "IBM");

    assert!(matches!(dashboard.load(Page::Home, "IBM").await, PageData::Home));
}
