#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/findash/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Alpha Vantage API client.
//!
//! This crate talks to the [Alpha Vantage](https://www.alphavantage.co/) REST
//! API. Every call goes through [`AlphaVantageClient::request`], which never
//! fails: transport, status and payload errors are logged and turned into an
//! empty JSON object. [`AlphaVantageClient::try_request`] exposes the
//! underlying `Result` for callers that want to tell the cases apart.
//!
//! # Usage
//!
//! ```rust,ignore
//! use findash_alphavantage::AlphaVantageClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads ALPHA_VANTAGE_API_KEY when no key is passed.
//!     let client = AlphaVantageClient::new(None)?;
//!
//!     let overview = client.overview("IBM").await;
//!     let balance_sheet = client.balance_sheet("IBM").await;
//!     let bars = client.daily_time_series("IBM", false).await;
//!
//!     Ok(())
//! }
//! ```

/// News topic filters.
pub mod news;
/// Retry policy.
pub mod retry;
/// HTTP transport backed by `reqwest`.
pub mod transport;

pub use news::{DEFAULT_NEWS_LIMIT, SUPPORTED_TOPICS, Topics};
pub use retry::RetryPolicy;
pub use transport::ReqwestTransport;

use findash_core::{
    API_KEY_ENV, API_KEY_PARAM, CacheKey, Credential, DashError, Endpoint, FUNCTION_PARAM,
    HttpResponse, Interval, Query, ResponseCache, Result, SYMBOL_PARAM, Settings, StatementKind,
    Transport,
};
use retry::Attempt;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Endpoint every request is sent to.
pub const ALPHA_VANTAGE_BASE_URL: &str = "https://www.alphavantage.co/query";

/// Provider name used in logs and errors.
pub const PROVIDER_NAME: &str = "Alpha Vantage";

/// Longest slice of a response body quoted in an error.
const MAX_ERROR_BODY: usize = 200;

/// Alpha Vantage API client.
///
/// Cloning is cheap; clones share the transport and the cache.
#[derive(Clone)]
pub struct AlphaVantageClient {
    transport: Arc<dyn Transport>,
    credential: Credential,
    base_url: String,
    retry: RetryPolicy,
    cache: Option<Arc<dyn ResponseCache>>,
}

impl fmt::Debug for AlphaVantageClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlphaVantageClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

impl AlphaVantageClient {
    /// Create a client that sends real HTTP requests.
    ///
    /// The credential is `api_key` if given and non-empty, otherwise the
    /// value of `ALPHA_VANTAGE_API_KEY`.
    ///
    /// # Errors
    /// Returns [`DashError::Configuration`] if no credential is available.
    pub fn new(api_key: Option<&str>) -> Result<Self> {
        let credential = Credential::resolve(api_key, API_KEY_ENV)?;
        Ok(Self::with_transport(
            Arc::new(ReqwestTransport::new()?),
            credential,
        ))
    }

    /// Create a client from the environment alone.
    ///
    /// # Errors
    /// Returns [`DashError::Configuration`] if `ALPHA_VANTAGE_API_KEY` is unset.
    pub fn from_env() -> Result<Self> {
        Self::new(None)
    }

    /// Create a client from previously read [`Settings`].
    ///
    /// # Errors
    /// Returns [`DashError::Configuration`] if neither `api_key` nor the
    /// settings carry a credential.
    pub fn from_settings(settings: &Settings, api_key: Option<&str>) -> Result<Self> {
        let credential = settings.credential(api_key)?;
        Ok(Self::with_transport(
            Arc::new(ReqwestTransport::new()?),
            credential,
        ))
    }

    /// Create a client over a custom transport.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>, credential: Credential) -> Self {
        Self {
            transport,
            credential,
            base_url: ALPHA_VANTAGE_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
            cache: None,
        }
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Memoize successful responses in `cache`.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Send requests somewhere other than [`ALPHA_VANTAGE_BASE_URL`].
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The active retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// The response cache, if one is configured.
    #[must_use]
    pub fn cache(&self) -> Option<&Arc<dyn ResponseCache>> {
        self.cache.as_ref()
    }

    /// Build the query for one call.
    ///
    /// `params` override `function` and `apikey`; `symbol` overrides them all.
    #[must_use]
    pub fn prepare_query(&self, endpoint: Endpoint, symbol: Option<&str>, params: &Query) -> Query {
        let mut query = Query::new()
            .with(FUNCTION_PARAM, endpoint.function())
            .with(API_KEY_PARAM, self.credential.expose());
        query.merge(params);
        if let Some(symbol) = symbol {
            query.insert(SYMBOL_PARAM, symbol);
        }
        query
    }

    fn validate(endpoint: Endpoint, symbol: Option<&str>, params: &Query) -> Result<()> {
        let spec = endpoint.spec();

        let has_symbol = symbol.or_else(|| params.get(SYMBOL_PARAM)).is_some_and(|s| !s.trim().is_empty());
        if spec.requires_symbol && !has_symbol {
            return Err(DashError::InvalidParameter(format!(
                "{endpoint} requires a symbol"
            )));
        }

        if let Some(missing) = spec.required.iter().find(|p| !params.contains_key(p)) {
            return Err(DashError::InvalidParameter(format!(
                "{endpoint} requires the {missing} parameter"
            )));
        }

        for param in params.keys() {
            if ![FUNCTION_PARAM, API_KEY_PARAM, SYMBOL_PARAM].contains(&param) && !spec.accepts(param) {
                warn!(endpoint = %endpoint, param, "Parameter not documented for endpoint, sending anyway");
            }
        }

        Ok(())
    }

    /// Fetch one endpoint, reporting every failure.
    ///
    /// # Errors
    /// - [`DashError::InvalidParameter`] when a required symbol or parameter is missing
    /// - [`DashError::RetriesExhausted`] when the network kept failing
    /// - [`DashError::Http`] for a non-success status
    /// - [`DashError::Parse`] when the body is not JSON
    /// - [`DashError::Provider`] / [`DashError::RateLimited`] for error payloads
    pub async fn try_request(
        &self,
        endpoint: Endpoint,
        symbol: Option<&str>,
        params: &Query,
    ) -> Result<Value> {
        Self::validate(endpoint, symbol, params)?;
        let query = self.prepare_query(endpoint, symbol, params);
        let key = CacheKey::from_query(endpoint, &query);

        if let Some(cache) = &self.cache {
            match cache.get(&key).await {
                Ok(Some(value)) => {
                    debug!(provider = PROVIDER_NAME, key = %key, "Serving response from cache");
                    return Ok(value);
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Cache read failed"),
            }
        }

        debug!(provider = PROVIDER_NAME, endpoint = %endpoint, symbol = ?symbol, "Alpha Vantage request");

        let transport = &self.transport;
        let (url, query_ref, policy) = (self.base_url.as_str(), &query, &self.retry);
        let response = self
            .retry
            .run(move || async move {
                let response = transport.get(url, query_ref).await?;
                if policy.retries_status(response.status) {
                    Ok(Attempt::RetryStatus(response.status))
                } else {
                    Ok(Attempt::Done(response))
                }
            })
            .await?;

        let value = decode(response)?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(&key, &value).await {
                warn!(error = %e, "Cache write failed");
            }
        }

        Ok(value)
    }

    /// Fetch one endpoint. Failures are logged and yield an empty object.
    pub async fn request(&self, endpoint: Endpoint, symbol: Option<&str>, params: &Query) -> Value {
        degrade(endpoint, self.try_request(endpoint, symbol, params).await)
    }

    /// Company overview and headline ratios.
    pub async fn overview(&self, symbol: &str) -> Value {
        self.request(Endpoint::Overview, Some(symbol), &Query::new()).await
    }

    /// Annual and quarterly balance sheets.
    pub async fn balance_sheet(&self, symbol: &str) -> Value {
        self.statement(StatementKind::BalanceSheet, symbol).await
    }

    /// Annual and quarterly income statements.
    pub async fn income_statement(&self, symbol: &str) -> Value {
        self.statement(StatementKind::IncomeStatement, symbol).await
    }

    /// Annual and quarterly cash flow statements.
    pub async fn cash_flow(&self, symbol: &str) -> Value {
        self.statement(StatementKind::CashFlow, symbol).await
    }

    /// One of the three financial statements.
    pub async fn statement(&self, kind: StatementKind, symbol: &str) -> Value {
        self.request(kind.endpoint(), Some(symbol), &Query::new()).await
    }

    /// Tickers matching `keywords`.
    pub async fn search(&self, keywords: &str) -> Value {
        let params = Query::new().with("keywords", keywords);
        self.request(Endpoint::SymbolSearch, None, &params).await
    }

    /// Daily bars; the last 100 unless `full_history` is set.
    pub async fn daily_time_series(&self, symbol: &str, full_history: bool) -> Value {
        self.time_series(symbol, Interval::Daily, full_history).await
    }

    /// Weekly bars.
    pub async fn weekly_time_series(&self, symbol: &str) -> Value {
        self.time_series(symbol, Interval::Weekly, false).await
    }

    /// Monthly bars.
    pub async fn monthly_time_series(&self, symbol: &str) -> Value {
        self.time_series(symbol, Interval::Monthly, false).await
    }

    /// Bars at `interval`. `full_history` only affects daily bars.
    pub async fn time_series(&self, symbol: &str, interval: Interval, full_history: bool) -> Value {
        let mut params = Query::new();
        if interval == Interval::Daily {
            params.insert("outputsize", if full_history { "full" } else { "compact" });
        }
        self.request(interval.endpoint(), Some(symbol), &params).await
    }

    /// Reported and estimated earnings.
    pub async fn earnings(&self, symbol: &str) -> Value {
        self.request(Endpoint::Earnings, Some(symbol), &Query::new()).await
    }

    /// News and sentiment for `symbol`, sent as `tickers`.
    ///
    /// `limit` defaults to [`DEFAULT_NEWS_LIMIT`]. Topics outside
    /// [`SUPPORTED_TOPICS`] are sent anyway and logged.
    pub async fn market_news_sentiment(
        &self,
        symbol: &str,
        topics: Option<&Topics>,
        limit: Option<u32>,
    ) -> Value {
        let mut params = Query::new().with("limit", limit.unwrap_or(DEFAULT_NEWS_LIMIT));
        if !symbol.trim().is_empty() {
            params.insert("tickers", symbol);
        }
        if let Some(topics) = topics.filter(|t| !t.is_empty()) {
            let unsupported = topics.unsupported();
            if !unsupported.is_empty() {
                warn!(?unsupported, "Unsupported news topics requested");
            }
            params.insert("topics", topics.to_param());
        }
        self.request(Endpoint::NewsSentiment, None, &params).await
    }

    /// Top gainers, losers and most traded tickers of the day.
    pub async fn top_gainers_losers(&self) -> Value {
        self.request(Endpoint::TopGainersLosers, None, &Query::new()).await
    }
}

/// Turns a failed fetch into an empty object.
fn degrade(endpoint: Endpoint, result: Result<Value>) -> Value {
    match result {
        Ok(value) => value,
        Err(e) => {
            error!(endpoint = %endpoint, error = %e, "Alpha Vantage request failed, returning empty response");
            Value::Object(Map::new())
        }
    }
}

fn snippet(body: &str) -> String {
    body.trim().chars().take(MAX_ERROR_BODY).collect()
}

/// Checks status and payload of a final response.
fn decode(response: HttpResponse) -> Result<Value> {
    if !response.is_success() {
        return Err(DashError::Http {
            status: response.status,
            message: snippet(&response.body),
        });
    }

    let value: Value = serde_json::from_str(&response.body)
        .map_err(|e| DashError::Parse(format!("{e}: {}", snippet(&response.body))))?;

    if let Some(object) = value.as_object() {
        if let Some(message) = object.get("Error Message") {
            return Err(DashError::Provider(payload_text(message)));
        }
        if let Some(message) = object.get("Note").or_else(|| object.get("Information")) {
            return Err(DashError::RateLimited {
                provider: PROVIDER_NAME.to_string(),
                message: payload_text(message),
            });
        }
    }

    Ok(value)
}

fn payload_text(value: &Value) -> String {
    value.as_str().map_or_else(|| value.to_string(), str::to_string)
}
