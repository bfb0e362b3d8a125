//! Reporting period and time series interval definitions.
//!
//! This module defines [`ReportPeriod`] for choosing between annual and
//! quarterly statements and [`Interval`] for the granularity of price series.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::endpoint::Endpoint;
use crate::error::DashError;

/// Period type for fundamental statement data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportPeriod {
    /// Annual reporting period.
    #[default]
    Annual,
    /// Quarterly reporting period.
    Quarterly,
}

impl ReportPeriod {
    /// Key under which the provider nests the reports list.
    #[must_use]
    pub const fn reports_key(&self) -> &'static str {
        match self {
            Self::Annual => "annualReports",
            Self::Quarterly => "quarterlyReports",
        }
    }
}

/// Granularity of a price time series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    /// Daily bars.
    #[default]
    Daily,
    /// Weekly bars.
    Weekly,
    /// Monthly bars.
    Monthly,
}

impl Interval {
    /// All intervals, finest first.
    pub const ALL: [Self; 3] = [Self::Daily, Self::Weekly, Self::Monthly];

    /// The endpoint serving this interval.
    #[must_use]
    pub const fn endpoint(&self) -> Endpoint {
        match self {
            Self::Daily => Endpoint::TimeSeriesDaily,
            Self::Weekly => Endpoint::TimeSeriesWeekly,
            Self::Monthly => Endpoint::TimeSeriesMonthly,
        }
    }

    /// Key under which the provider nests the bars.
    #[must_use]
    pub const fn series_key(&self) -> &'static str {
        match self {
            Self::Daily => "Time Series (Daily)",
            Self::Weekly => "Weekly Time Series",
            Self::Monthly => "Monthly Time Series",
        }
    }

    /// Lowercase name used on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|i| i.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DashError::InvalidParameter(format!("Unknown interval: {s}")))
    }
}
