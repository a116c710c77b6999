//! Per-request configuration.

use crate::error::ConfigError;
use std::collections::HashMap;
use std::time::Duration;

/// A single GET request: target URL, query parameters and an optional timeout.
///
/// Query parameter values are percent-encoded when the URL is built, so they
/// may contain any characters.
///
/// # Examples
///
/// ```
/// use safecall::GetRequest;
/// use std::time::Duration;
///
/// let request = GetRequest::new("https://jsonplaceholder.typicode.com/posts")
///     .with_query_param("userId", "1")
///     .with_timeout(Duration::from_secs(2))
///     .unwrap();
///
/// assert_eq!(request.query_params.get("userId").map(String::as_str), Some("1"));
/// ```
#[derive(Debug, Clone)]
pub struct GetRequest {
    /// The fully qualified URL.
    pub url: String,

    /// Query parameters appended to the URL. Order is not significant.
    pub query_params: HashMap<String, String>,

    /// Overrides the executor's default timeout for this request.
    pub timeout: Option<Duration>,
}

impl GetRequest {
    /// Creates a request for `url` with no query parameters.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query_params: HashMap::new(),
            timeout: None,
        }
    }

    /// Adds a query parameter to the request.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(key.into(), value.into());
        self
    }

    /// Adds multiple query parameters to the request.
    pub fn with_query_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query_params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets the timeout for this request.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeout`] if `timeout` is zero.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        self.timeout = Some(timeout);
        Ok(self)
    }
}
