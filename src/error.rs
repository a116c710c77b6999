//! Error types for requests and executor configuration.
//!
//! Every failure a request can run into is reified as an [`ApiError`] whose
//! [`ErrorKind`] is drawn from a closed set. Mistakes made while configuring
//! the executor or a request are reported separately as [`ConfigError`] and
//! never reach the network.

use http::StatusCode;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// The closed set of categories a failed request resolves to.
///
/// # Examples
///
/// ```
/// use safecall::ErrorKind;
///
/// assert!(ErrorKind::Timeout.is_transient());
/// assert!(!ErrorKind::HttpStatus.is_transient());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The transport could not reach the server (refused connection, DNS failure, etc.).
    ConnectionFailure,

    /// No complete response arrived within the configured timeout.
    Timeout,

    /// The server answered with a status code of 400 or above.
    HttpStatus,

    /// The response body could not be decoded into the expected structure.
    Malformed,

    /// Any other transport failure, such as an unparseable URL.
    Unknown,
}

impl ErrorKind {
    /// Returns `true` for failures that retrying might resolve.
    ///
    /// Only connection failures and timeouts are transient. HTTP status errors
    /// and malformed bodies describe the remote resource itself and are never
    /// retried.
    pub fn is_transient(self) -> bool {
        matches!(self, ErrorKind::ConnectionFailure | ErrorKind::Timeout)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::ConnectionFailure => "connection failure",
            ErrorKind::Timeout => "timeout",
            ErrorKind::HttpStatus => "http status",
            ErrorKind::Malformed => "malformed response",
            ErrorKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A classified request failure.
///
/// `ApiError` is built once where the failure is detected and handed back to
/// the caller as-is. Its fields are only reachable through accessors.
///
/// # Examples
///
/// ```no_run
/// use safecall::{ErrorKind, Executor};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let executor = Executor::builder().build()?;
///
/// match executor.get::<serde_json::Value>("https://api.example.com/posts/1").await {
///     Ok(response) => println!("Success: {}", response.data),
///     Err(e) if e.kind() == ErrorKind::HttpStatus => {
///         eprintln!("Server answered {:?}", e.status_code());
///     }
///     Err(e) => eprintln!("{} ({})", e, e.kind()),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    status_code: Option<u16>,
    detail: Option<String>,
    raw_response: Option<String>,
}

impl ApiError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
            detail: None,
            raw_response: None,
        }
    }

    pub(crate) fn connection_failure(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
            ..Self::new(ErrorKind::ConnectionFailure, "connection failed")
        }
    }

    pub(crate) fn timeout(after: Duration) -> Self {
        Self::new(
            ErrorKind::Timeout,
            format!("request timed out after {:?}", after),
        )
    }

    pub(crate) fn http_status(status: StatusCode, raw_response: String) -> Self {
        Self {
            status_code: Some(status.as_u16()),
            raw_response: Some(raw_response),
            ..Self::new(
                ErrorKind::HttpStatus,
                format!("HTTP error {}", status.as_u16()),
            )
        }
    }

    pub(crate) fn malformed(detail: impl Into<String>, raw_response: String) -> Self {
        Self {
            detail: Some(detail.into()),
            raw_response: Some(raw_response),
            ..Self::new(
                ErrorKind::Malformed,
                "response body is not valid structured data",
            )
        }
    }

    pub(crate) fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, message)
    }

    /// The failure category.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// A short human-readable description of the failure.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The HTTP status code. Only present when the kind is [`ErrorKind::HttpStatus`].
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// The underlying diagnostic from the transport or decoder, if any.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// The raw response body for HTTP status and malformed-body failures.
    pub fn raw_response(&self) -> Option<&str> {
        self.raw_response.as_deref()
    }

    /// Shorthand for `self.kind().is_transient()`.
    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}

/// Invalid executor or request configuration.
///
/// These are caller mistakes and are rejected before any request is sent.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A timeout of zero can never be met.
    #[error("Timeout must be greater than zero")]
    InvalidTimeout,

    /// A retry strategy that allows zero attempts would never send the request.
    #[error("Retry strategy must allow at least one attempt")]
    InvalidRetryStrategy,

    /// A default header name or value was rejected.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The underlying HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// A specialized `Result` type for request execution.
///
/// This is a convenience alias for `Result<T, ApiError>`.
pub type Result<T> = std::result::Result<T, ApiError>;
