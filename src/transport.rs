//! The seam between request building and the network.
//!
//! Requests and responses cross this boundary as plain data, so the builder
//! and parser never touch the network themselves. [`ReqwestTransport`] is
//! the default; tests and embedders can supply any other [`Transport`].

use crate::Result;
use http::{HeaderMap, Method, StatusCode};
use std::future::Future;
use std::time::Duration;
use url::Url;

/// A fully built HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// The HTTP method (`GET` for single lookups, `POST` for batches).
    pub method: Method,
    /// The absolute URL, credentials and address fields included.
    pub url: Url,
    /// Headers to send.
    pub headers: HeaderMap,
    /// The JSON body, for batches.
    pub body: Option<String>,
}

impl PreparedRequest {
    /// The URL with the auth token masked, for logging.
    pub fn redacted_url(&self) -> String {
        let mut url = self.url.clone();
        let pairs: Vec<(String, String)> = self
            .url
            .query_pairs()
            .map(|(k, v)| {
                let v = if k == "auth-token" {
                    "REDACTED".to_string()
                } else {
                    v.into_owned()
                };
                (k.into_owned(), v)
            })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(pairs);
        url.to_string()
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The response headers.
    pub headers: HeaderMap,
    /// The response body as text.
    pub body: String,
}

/// Executes prepared requests.
///
/// # Examples
///
/// ```
/// use smarty_street::transport::{PreparedRequest, RawResponse, Transport};
/// use http::{HeaderMap, StatusCode};
///
/// struct AlwaysEmpty;
///
/// impl Transport for AlwaysEmpty {
///     async fn send(&self, _request: PreparedRequest) -> smarty_street::Result<RawResponse> {
///         Ok(RawResponse {
///             status: StatusCode::OK,
///             headers: HeaderMap::new(),
///             body: "[]".to_string(),
///         })
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Sends the request and returns the provider's answer, whatever its status.
    ///
    /// Only failures to obtain a response at all are errors here; status
    /// handling belongs to the response parser.
    fn send(&self, request: PreparedRequest) -> impl Future<Output = Result<RawResponse>> + Send;
}

/// The default transport, backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
    timeout: Option<Duration>,
}

impl ReqwestTransport {
    /// Wraps an existing `reqwest::Client`.
    pub fn new(http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            timeout: None,
        }
    }

    /// Applies a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse> {
        let mut builder = self
            .http_client
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
