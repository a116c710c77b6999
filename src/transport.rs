//! The transport seam between the executor and the network.
//!
//! The executor never talks to sockets directly. It hands a URL, query
//! parameters and a timeout to a [`Transport`] and classifies whatever comes
//! back. [`ReqwestTransport`] is the implementation used in production; tests
//! plug in simulated transports to drive every failure mode deterministically.

use http::{HeaderMap, StatusCode};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// A complete HTTP response as received by a transport, body not yet decoded.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The response headers.
    pub headers: HeaderMap,
    /// The full response body, undecoded.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// The body as text, with invalid UTF-8 replaced. For diagnostics only.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Creates a response with the given status and body and no headers.
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

/// Failures a transport reports before a complete response is received.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The connection could not be established (refused, DNS failure, etc.).
    #[error("Connection error: {0}")]
    Connect(String),

    /// The request did not complete within the timeout.
    #[error("Request timed out")]
    Timeout,

    /// The URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Anything else the transport could not complete.
    #[error("Transport error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        // A connect attempt cut off by the timeout reports both flags; the
        // timeout is the proximate cause.
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// Sends a single GET request.
///
/// Implementations must not retry, classify status codes or decode the body;
/// the executor does all of that.
///
/// # Examples
///
/// ```
/// use safecall::transport::{RawResponse, Transport, TransportError};
/// use http::StatusCode;
/// use std::collections::HashMap;
/// use std::time::Duration;
///
/// struct AlwaysNotFound;
///
/// impl Transport for AlwaysNotFound {
///     async fn send(
///         &self,
///         _url: &str,
///         _params: &HashMap<String, String>,
///         _timeout: Duration,
///     ) -> Result<RawResponse, TransportError> {
///         Ok(RawResponse::new(StatusCode::NOT_FOUND, "Not found"))
///     }
/// }
/// ```
pub trait Transport: Send + Sync + 'static {
    /// Sends a GET to `url` with `params` appended as the query string,
    /// giving up after `timeout`.
    fn send(
        &self,
        url: &str,
        params: &HashMap<String, String>,
        timeout: Duration,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// A [`Transport`] backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Wraps an already configured `reqwest::Client`.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn send(
        &self,
        url: &str,
        params: &HashMap<String, String>,
        timeout: Duration,
    ) -> Result<RawResponse, TransportError> {
        let mut url = Url::parse(url).map_err(|e| TransportError::InvalidUrl(e.to_string()))?;

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }

        let response = self.client.get(url).timeout(timeout).send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
