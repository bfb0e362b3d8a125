//! HTTP transport abstraction.
//!
//! The client never talks to the network directly. It hands a base URL and a
//! [`Query`] to a [`Transport`] and gets back the status code and body text.
//! [`ScriptedTransport`] is an in-process implementation that replays canned
//! replies, used by tests and offline demos.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;
use std::sync::{Mutex, MutexGuard};

use crate::{
    error::{DashError, Result},
    types::{FUNCTION_PARAM, Query},
};

/// Raw answer of one HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl HttpResponse {
    /// Creates a response from status and body.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A `200 OK` response carrying `value` as JSON.
    #[must_use]
    pub fn json(value: &Value) -> Self {
        Self::new(200, value.to_string())
    }

    /// An empty-bodied response with the given status.
    #[must_use]
    pub fn status(status: u16) -> Self {
        Self::new(status, String::new())
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Performs one GET request.
///
/// Implementations return `Ok` for any HTTP answer, whatever its status, and
/// [`DashError::Network`] when no answer was received at all.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Sends `GET url?query` and returns the answer.
    async fn get(&self, url: &str, query: &Query) -> Result<HttpResponse>;
}

/// One canned reply of a [`ScriptedTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptedReply {
    /// The server answers.
    Response(HttpResponse),
    /// The connection fails.
    NetworkFailure(String),
}

impl From<HttpResponse> for ScriptedReply {
    fn from(response: HttpResponse) -> Self {
        Self::Response(response)
    }
}

#[derive(Debug, Default)]
struct Script {
    default: VecDeque<ScriptedReply>,
    routes: HashMap<String, VecDeque<ScriptedReply>>,
    requests: Vec<(String, Query)>,
}

/// Transport that replays scripted replies.
///
/// Replies are consumed in order. The last reply of a script repeats once the
/// others are used up. Replies registered with [`route`](Self::route) are
/// chosen by the request's `function` parameter and take precedence over the
/// default script. Every request is recorded.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<Script>,
}

impl ScriptedTransport {
    /// Creates a transport with an empty script. Unscripted requests fail
    /// with a network error.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport replaying `replies` for every request.
    #[must_use]
    pub fn with_replies<I, R>(replies: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<ScriptedReply>,
    {
        let transport = Self::new();
        transport.lock().default = replies.into_iter().map(Into::into).collect();
        transport
    }

    /// Creates a transport answering every request with `value`.
    #[must_use]
    pub fn always(value: &Value) -> Self {
        Self::with_replies([HttpResponse::json(value)])
    }

    /// Scripts the replies for requests whose `function` is `function`.
    #[must_use]
    pub fn route<I, R>(self, function: &str, replies: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<ScriptedReply>,
    {
        self.lock().routes.insert(
            function.to_string(),
            replies.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.lock().requests.len()
    }

    /// Requests received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<(String, Query)> {
        self.lock().requests.clone()
    }

    /// The most recent request's query.
    #[must_use]
    pub fn last_query(&self) -> Option<Query> {
        self.lock().requests.last().map(|(_, q)| q.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        // A poisoned script only means another test thread panicked mid-call.
        self.script.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn next_reply(queue: &mut VecDeque<ScriptedReply>) -> Option<ScriptedReply> {
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str, query: &Query) -> Result<HttpResponse> {
        let mut script = self.lock();
        script.requests.push((url.to_string(), query.clone()));

        let routed = query
            .get(FUNCTION_PARAM)
            .and_then(|f| script.routes.get_mut(f))
            .and_then(next_reply);
        let reply = match routed {
            Some(reply) => Some(reply),
            None => next_reply(&mut script.default),
        };

        match reply {
            Some(ScriptedReply::Response(response)) => Ok(response),
            Some(ScriptedReply::NetworkFailure(reason)) => Err(DashError::Network(reason)),
            None => Err(DashError::Network(format!(
                "no scripted reply for {:?}",
                query.get(FUNCTION_PARAM)
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_replies_in_order_then_repeat_last() {
        let transport =
            ScriptedTransport::with_replies([HttpResponse::status(503), HttpResponse::json(&json!({"ok": 1}))]);
        let query = Query::new();

        assert_eq!(transport.get("u", &query).await.unwrap().status, 503);
        assert_eq!(transport.get("u", &query).await.unwrap().status, 200);
        assert_eq!(transport.get("u", &query).await.unwrap().status, 200);
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_routes_by_function() {
        let transport = ScriptedTransport::always(&json!({"default": true}))
            .route("OVERVIEW", [HttpResponse::json(&json!({"Symbol": "IBM"}))]);

        let overview = Query::new().with(FUNCTION_PARAM, "OVERVIEW");
        let other = Query::new().with(FUNCTION_PARAM, "EARNINGS");

        let body = transport.get("u", &overview).await.unwrap().body;
        assert!(body.contains("IBM"));
        let body = transport.get("u", &other).await.unwrap().body;
        assert!(body.contains("default"));
        assert_eq!(transport.last_query(), Some(other));
    }

    #[tokio::test]
    async fn test_network_failure_and_empty_script() {
        let transport = ScriptedTransport::with_replies([ScriptedReply::NetworkFailure("reset".into())]);
        let err = transport.get("u", &Query::new()).await.unwrap_err();
        assert!(err.is_transient());

        let err = ScriptedTransport::new().get("u", &Query::new()).await.unwrap_err();
        assert!(matches!(err, DashError::Network(_)));
    }

    #[test]
    fn test_success_range() {
        assert!(HttpResponse::status(204).is_success());
        assert!(!HttpResponse::status(404).is_success());
    }
}
