//! The success side of a request: decoded payload plus transaction details.

use crate::validate::{validate, ValidationReport};
use http::{HeaderMap, StatusCode};
use std::time::Duration;

/// A successfully decoded response.
///
/// # Type Parameters
///
/// * `T` - The type of the decoded payload
///
/// # Examples
///
/// ```no_run
/// use safecall::Executor;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct User {
///     name: String,
///     email: String,
/// }
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let executor = Executor::builder().build()?;
/// let user = executor
///     .get::<User>("https://jsonplaceholder.typicode.com/users/1")
///     .await?;
///
/// println!("{} <{}>", user.data.name, user.email);
/// println!("Took {:?} over {} attempt(s)", user.latency, user.attempts);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The decoded payload.
    pub data: T,

    /// The raw response body as received.
    pub raw_body: String,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from the first attempt until the response was decoded,
    /// including any retry delays.
    pub latency: Duration,

    /// The number of attempts it took. `1` when no retry was needed.
    pub attempts: usize,
}

impl<T> Response<T> {
    /// Creates a new `Response`.
    pub fn new(
        data: T,
        raw_body: String,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
        attempts: usize,
    ) -> Self {
        Self {
            data,
            raw_body,
            status,
            headers,
            latency,
            attempts,
        }
    }

    /// Maps the payload to a different type, keeping the metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// # use safecall::Response;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response::new(
    ///     42,
    ///     "42".to_string(),
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     Duration::from_millis(100),
    ///     1,
    /// );
    ///
    /// let string_response = response.map(|n| n.to_string());
    /// assert_eq!(string_response.data, "42");
    /// ```
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            raw_body: self.raw_body,
            status: self.status,
            headers: self.headers,
            latency: self.latency,
            attempts: self.attempts,
        }
    }

    /// Returns `true` if the request needed more than one attempt.
    pub fn was_retried(&self) -> bool {
        self.attempts > 1
    }

    /// Returns a header value by name, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

impl Response<serde_json::Value> {
    /// Checks the payload for the given dotted field paths.
    ///
    /// # Examples
    ///
    /// ```
    /// # use safecall::Response;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let body = r#"{"name": "Leanne Graham", "email": "Sincere@april.biz"}"#;
    /// let response = Response::new(
    ///     serde_json::from_str::<serde_json::Value>(body).unwrap(),
    ///     body.to_string(),
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     Duration::from_millis(40),
    ///     1,
    /// );
    ///
    /// let report = response.validate(&["name", "email", "phone"]);
    /// assert_eq!(report.missing_fields(), ["phone"]);
    /// ```
    pub fn validate<P: AsRef<str>>(&self, required_paths: &[P]) -> ValidationReport {
        validate(&self.data, required_paths)
    }
}

impl<T> AsRef<T> for Response<T> {
    fn as_ref(&self) -> &T {
        &self.data
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_response(data: serde_json::Value) -> Response<serde_json::Value> {
        Response::new(
            data,
            String::new(),
            StatusCode::OK,
            HeaderMap::new(),
            Duration::from_millis(40),
            1,
        )
    }

    #[test]
    fn test_validate_reports_missing_fields() {
        let response = user_response(json!({
            "name": "Leanne Graham",
            "email": "Sincere@april.biz",
            "address": {"city": "Gwenborough"}
        }));

        let report = response.validate(&["name", "address.city", "address.zipcode", "phone"]);
        assert_eq!(report.missing_fields(), ["address.zipcode", "phone"]);
    }

    #[test]
    fn test_validate_passes_on_complete_payload() {
        let response = user_response(json!({"name": "Leanne Graham", "phone": "1-770"}));
        assert!(response.validate(&["name", "phone"]).is_valid());
    }
}
