#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/findash/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Response normalization for the findash dashboard.
//!
//! - [`normalize_statement`] - Period reports to a field × period [`StatementTable`]
//! - [`clean_for_chart`] / [`chart_category_series`] - Chart preparation
//! - [`time_series_frame`] - OHLCV bars as a polars frame
//! - [`company_profile`] / [`kpi_frame`] - Company overview views
//! - [`search_matches`] - Typed symbol search results

/// Chart preparation.
pub mod chart;
/// Company overview views.
pub mod overview;
/// Price bars.
pub mod quotes;
/// Symbol search results.
pub mod search;
/// Statement normalization.
pub mod statement;
/// The statement table type.
pub mod table;

pub use chart::{ChartSeries, CleanOptions, SeriesPoint, chart_category_series, clean_for_chart};
pub use overview::{BASIC_INFO_KEYS, company_profile, kpi_frame};
pub use quotes::time_series_frame;
pub use search::{SearchMatch, search_matches};
pub use statement::{normalize_statement, reports_from_response, statement_from_response};
pub use table::{FIELD_COLUMN, StatementTable};
