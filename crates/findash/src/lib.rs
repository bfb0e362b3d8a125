#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/findash/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Financial dashboard backend.
//!
//! This crate re-exports the core types, the Alpha Vantage client, the caches
//! and the normalizers, and provides a [`Dashboard`] that loads each
//! dashboard [`Page`] for a ticker.
//!
//! # Example
//!
//! ```rust,ignore
//! use findash::{Dashboard, Page, PageData};
//!
//! #[tokio::main]
//! async fn main() -> findash::Result<()> {
//!     let dashboard = Dashboard::from_env()?;
//!
//!     if let PageData::Statement { table, .. } = dashboard.load(Page::BalanceSheet, "IBM").await {
//!         println!("{table}");
//!     }
//!
//!     let series = dashboard
//!         .chart_series(findash::StatementKind::BalanceSheet, "IBM", "totalAssets")
//!         .await?;
//!     println!("{:?}", series.values());
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use findash_core::*;

// Cache implementations
pub use findash_cache::{CacheStats, InMemoryCache, NoopCache};

// Provider client
pub use findash_alphavantage::{
    ALPHA_VANTAGE_BASE_URL, AlphaVantageClient, DEFAULT_NEWS_LIMIT, ReqwestTransport, RetryPolicy,
    SUPPORTED_TOPICS, Topics,
};

// Normalization
pub use findash_normalize::{
    BASIC_INFO_KEYS, ChartSeries, CleanOptions, FIELD_COLUMN, SearchMatch, SeriesPoint,
    StatementTable, chart_category_series, clean_for_chart, company_profile, kpi_frame,
    normalize_statement, reports_from_response, search_matches, statement_from_response,
    time_series_frame,
};

mod dashboard;
pub use dashboard::{Dashboard, Page, PageData};
