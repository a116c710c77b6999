//! Request execution with failure classification and bounded retries.
//!
//! The [`Executor`] type is the main entry point for making requests.
//! Use [`ExecutorBuilder`] to configure and create executors.

use crate::{
    error::ConfigError,
    request::GetRequest,
    retry::{RetryOnTransient, RetryPredicate, RetryStrategy},
    transport::{RawResponse, ReqwestTransport, Transport, TransportError},
    ApiError, Response, Result,
};
use http::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Timeout applied to requests that do not set their own.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Issues GET requests and classifies every failure into an [`ApiError`].
///
/// An executor holds only immutable configuration, so it is cheap to clone
/// and can be shared freely between tasks.
///
/// # Examples
///
/// ```no_run
/// use safecall::{Executor, GetRequest, RetryStrategy};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let executor = Executor::builder()
///     .timeout(Duration::from_secs(5))
///     .retry_strategy(RetryStrategy::Fixed {
///         delay: Duration::from_secs(1),
///         max_attempts: 3,
///     })
///     .build()?;
///
/// let request = GetRequest::new("https://jsonplaceholder.typicode.com/posts")
///     .with_query_param("userId", "1");
///
/// let posts = executor.execute::<serde_json::Value>(request).await?;
/// println!("{} posts", posts.data.as_array().map_or(0, Vec::len));
/// # Ok(())
/// # }
/// ```
pub struct Executor<T = ReqwestTransport> {
    inner: Arc<ExecutorInner<T>>,
}

impl<T> Clone for Executor<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ExecutorInner<T> {
    transport: T,
    timeout: Duration,
    retry_strategy: RetryStrategy,
    retry_predicate: Box<dyn RetryPredicate>,
}

impl Executor {
    /// Creates a new `ExecutorBuilder` for configuring an executor.
    pub fn builder() -> ExecutorBuilder {
        ExecutorBuilder::new()
    }
}

impl<T: Transport> Executor<T> {
    /// Executes a GET request, retrying transient failures as configured.
    ///
    /// Every failure is returned as an [`ApiError`]; this never panics on a
    /// transport or decoding problem. When retries are exhausted the error
    /// from the last attempt is returned unchanged.
    pub async fn execute<Res>(&self, request: GetRequest) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        let timeout = request.timeout.unwrap_or(self.inner.timeout);
        let start_time = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let error = match self.execute_once::<Res>(&request, timeout, attempt).await {
                Ok((data, raw)) => {
                    return Ok(Response::new(
                        data,
                        raw.body_text(),
                        raw.status,
                        raw.headers,
                        start_time.elapsed(),
                        attempt,
                    ));
                }
                Err(e) => e,
            };

            if !error.is_transient() || !self.inner.retry_predicate.should_retry(&error, attempt)
            {
                return Err(error);
            }

            match self.inner.retry_strategy.delay_for_attempt(attempt) {
                Some(delay) => {
                    tracing::info!(
                        url = %request.url,
                        delay_ms = delay.as_millis(),
                        attempt = attempt,
                        "Retrying request after delay"
                    );
                    tokio::time::sleep(delay).await;
                }
                None => return Err(error),
            }
        }
    }

    /// Makes a GET request to `url` with no query parameters.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use safecall::Executor;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let executor = Executor::builder().build()?;
    /// let ticker = executor
    ///     .get::<serde_json::Value>("https://api.coinpaprika.com/v1/tickers/btc-bitcoin")
    ///     .await?;
    ///
    /// let report = ticker.validate(&["quotes.USD.price", "quotes.USD.percent_change_24h"]);
    /// if report.is_valid() {
    ///     println!("Price: {}", ticker.data["quotes"]["USD"]["price"]);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get<Res>(&self, url: impl Into<String>) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        self.execute(GetRequest::new(url)).await
    }

    /// Makes a GET request to `url` with the given query parameters.
    pub async fn get_with_params<Res, K, V>(
        &self,
        url: impl Into<String>,
        params: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
        K: Into<String>,
        V: Into<String>,
    {
        self.execute(GetRequest::new(url).with_query_params(params))
            .await
    }

    /// Runs a single attempt and logs its outcome.
    async fn execute_once<Res>(
        &self,
        request: &GetRequest,
        timeout: Duration,
        attempt: usize,
    ) -> Result<(Res, RawResponse)>
    where
        Res: DeserializeOwned,
    {
        tracing::info!(url = %request.url, attempt = attempt, "Requesting URL");

        let started = Instant::now();
        let outcome = self.send_and_decode(request, timeout).await;

        match &outcome {
            Ok((_, raw)) => tracing::info!(
                url = %request.url,
                status = raw.status.as_u16(),
                latency_ms = started.elapsed().as_millis(),
                attempt = attempt,
                "Request succeeded"
            ),
            Err(e) => tracing::error!(
                url = %request.url,
                kind = %e.kind(),
                status_code = ?e.status_code(),
                detail = ?e.detail(),
                attempt = attempt,
                "Request failed: {}",
                e
            ),
        }

        outcome
    }

    /// Sends the request and classifies the outcome.
    async fn send_and_decode<Res>(
        &self,
        request: &GetRequest,
        timeout: Duration,
    ) -> Result<(Res, RawResponse)>
    where
        Res: DeserializeOwned,
    {
        let sent = tokio::time::timeout(
            timeout,
            self.inner
                .transport
                .send(&request.url, &request.query_params, timeout),
        )
        .await;

        let raw = match sent {
            Err(_elapsed) => return Err(ApiError::timeout(timeout)),
            Ok(Err(e)) => return Err(classify_transport_error(e, timeout)),
            Ok(Ok(raw)) => raw,
        };

        if raw.status.as_u16() >= 400 {
            return Err(ApiError::http_status(raw.status, raw.body_text()));
        }

        // from_slice rejects invalid UTF-8 instead of substituting U+FFFD.
        match serde_json::from_slice::<Res>(&raw.body) {
            Ok(data) => Ok((data, raw)),
            Err(e) => Err(ApiError::malformed(e.to_string(), raw.body_text())),
        }
    }
}

fn classify_transport_error(error: TransportError, timeout: Duration) -> ApiError {
    match error {
        TransportError::Timeout => ApiError::timeout(timeout),
        TransportError::Connect(detail) => ApiError::connection_failure(detail),
        TransportError::InvalidUrl(_) | TransportError::Other(_) => {
            ApiError::unknown(error.to_string())
        }
    }
}

/// Builder for configuring and creating an [`Executor`].
///
/// # Examples
///
/// ```no_run
/// use safecall::{ExecutorBuilder, RetryStrategy};
/// use safecall::retry::RetryOnTimeout;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), safecall::ConfigError> {
/// let executor = ExecutorBuilder::new()
///     .timeout(Duration::from_secs(10))
///     .retry_strategy(RetryStrategy::ExponentialBackoff {
///         initial_delay: Duration::from_millis(200),
///         max_delay: Duration::from_secs(2),
///         max_attempts: 4,
///         jitter: true,
///     })
///     .retry_predicate(Box::new(RetryOnTimeout))
///     .default_header("User-Agent", "weather-demo/1.0")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ExecutorBuilder {
    default_headers: HeaderMap,
    retry_strategy: RetryStrategy,
    retry_predicate: Option<Box<dyn RetryPredicate>>,
    timeout: Duration,
}

impl ExecutorBuilder {
    /// Creates a new `ExecutorBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            default_headers: HeaderMap::new(),
            retry_strategy: RetryStrategy::None,
            retry_predicate: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Adds a header sent with every request by the built-in reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> std::result::Result<Self, ConfigError> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| ConfigError::InvalidHeader(format!("name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| ConfigError::InvalidHeader(format!("value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the retry strategy for transient failures.
    pub fn retry_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.retry_strategy = strategy;
        self
    }

    /// Sets a predicate that narrows which transient failures are retried.
    ///
    /// By default every connection failure and timeout is retried.
    pub fn retry_predicate(mut self, predicate: Box<dyn RetryPredicate>) -> Self {
        self.retry_predicate = Some(predicate);
        self
    }

    /// Sets the default request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds an executor backed by a `reqwest` client.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is zero, the retry strategy allows no
    /// attempts, or the HTTP client cannot be built.
    pub fn build(self) -> std::result::Result<Executor, ConfigError> {
        let http_client = reqwest::Client::builder()
            .default_headers(self.default_headers.clone())
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        self.build_with_transport(ReqwestTransport::from_client(http_client))
    }

    /// Builds an executor that sends requests through `transport`.
    ///
    /// Default headers only apply to the built-in reqwest transport and are
    /// ignored here.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is zero or the retry strategy allows
    /// no attempts.
    pub fn build_with_transport<T: Transport>(
        self,
        transport: T,
    ) -> std::result::Result<Executor<T>, ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.retry_strategy.max_attempts() == 0 {
            return Err(ConfigError::InvalidRetryStrategy);
        }

        let retry_predicate = self
            .retry_predicate
            .unwrap_or_else(|| Box::new(RetryOnTransient));

        Ok(Executor {
            inner: Arc::new(ExecutorInner {
                transport,
                timeout: self.timeout,
                retry_strategy: self.retry_strategy,
                retry_predicate,
            }),
        })
    }
}

impl Default for ExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
