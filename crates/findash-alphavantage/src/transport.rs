//! `reqwest`-backed transport.

use async_trait::async_trait;
use findash_core::{DashError, HttpResponse, Query, Result, Transport};
use reqwest::Client;
use std::time::Duration;

/// Per-request timeout of the default client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`Transport`] sending real HTTP requests.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with a [`DEFAULT_TIMEOUT`] client.
    ///
    /// # Errors
    /// Returns [`DashError::Configuration`] if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| DashError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Create a transport with a custom HTTP client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

/// Maps a reqwest failure to the workspace error.
///
/// Failures where no usable answer arrived are transient; anything else
/// (builder, redirect, decode) is not.
fn classify(e: &reqwest::Error) -> DashError {
    if e.is_connect() || e.is_timeout() || e.is_request() || e.is_body() {
        DashError::Network(e.to_string())
    } else {
        DashError::Other(e.to_string())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, query: &Query) -> Result<HttpResponse> {
        let response = self
            .client
            .get(url)
            .query(&query.pairs())
            .send()
            .await
            .map_err(|e| classify(&e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| classify(&e))?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_transport_builds() {
        let transport = ReqwestTransport::new().unwrap();
        assert!(format!("{transport:?}").contains("ReqwestTransport"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transient() {
        let transport = ReqwestTransport::new().unwrap();
        // Port 9 (discard) on loopback is closed in test environments.
        let err = transport
            .get("http://127.0.0.1:9/query", &Query::new().with("function", "OVERVIEW"))
            .await
            .unwrap_err();
        assert!(err.is_transient(), "unexpected error: {err}");
    }
}
