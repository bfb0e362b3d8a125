#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/findash/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for the findash dashboard.
//!
//! - [`Endpoint`](endpoint::Endpoint) - Provider report types and their parameter contracts
//! - [`Transport`](transport::Transport) - HTTP seam used by the client
//! - [`ResponseCache`](cache::ResponseCache) - Caching abstraction
//! - [`Credential`](config::Credential) - API key resolution

/// Cache trait and key type for provider responses.
pub mod cache;
/// Credential resolution and environment settings.
pub mod config;
/// Endpoint table.
pub mod endpoint;
/// Error types for dashboard operations.
pub mod error;
/// Report period and price interval definitions.
pub mod period;
/// HTTP transport trait and a scripted implementation.
pub mod transport;
/// Core data types (Symbol, Query).
pub mod types;

// Re-export commonly used items at crate root
pub use cache::{CacheKey, ResponseCache};
pub use config::{API_KEY_ENV, Credential, LOG_LEVEL_ENV, LogLevel, Settings};
pub use endpoint::{ENDPOINTS, Endpoint, EndpointSpec, StatementKind};
pub use error::{DashError, Result};
pub use period::{Interval, ReportPeriod};
pub use transport::{HttpResponse, ScriptedReply, ScriptedTransport, Transport};
pub use types::{API_KEY_PARAM, FUNCTION_PARAM, Query, SYMBOL_PARAM, Symbol};
