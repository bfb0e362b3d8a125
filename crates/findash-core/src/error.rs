//! Error types for dashboard operations.
//!
//! This module defines [`DashError`] which covers every failure that can occur
//! while configuring the client, talking to the provider, reshaping responses,
//! or looking up chart categories.

use thiserror::Error;

/// Errors that can occur during dashboard operations.
#[derive(Error, Debug)]
pub enum DashError {
    /// Fatal configuration problem (e.g. missing API credential).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A chart category is not a row label of the table.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Network-related errors (connection failures, timeouts, broken bodies).
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status that is not retried.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The retry budget was used up without a usable response.
    #[error("Gave up after {attempts} attempts: {reason}")]
    RetriesExhausted {
        /// Number of attempts made, including the first one.
        attempts: u32,
        /// Failure seen on the last attempt.
        reason: String,
    },

    /// The provider throttled the request or refused it for plan reasons.
    #[error("Rate limited by {provider}: {message}")]
    RateLimited {
        /// The provider that sent the notice.
        provider: String,
        /// Notice text sent by the provider.
        message: String,
    },

    /// The provider reported an error inside a successful response.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Error parsing data from the provider.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error interacting with the cache.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Error building or reading a table.
    #[error("Table error: {0}")]
    Table(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl DashError {
    /// Returns true for transport failures that are worth another attempt.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Result type alias using [`DashError`].
pub type Result<T> = std::result::Result<T, DashError>;
