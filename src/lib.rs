//! # safecall - resilient requests against public JSON APIs
//!
//! safecall issues HTTP GET requests and turns every way they can go wrong
//! into an [`ApiError`] with a [`ErrorKind`] from a closed set, so callers
//! branch on a plain `Result` instead of guarding against surprises. A
//! companion [`validate`] function checks that a decoded payload actually has
//! the fields a caller is about to read.
//!
//! ## Quick Start
//!
//! ```no_run
//! use safecall::{Executor, ErrorKind, GetRequest};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let executor = Executor::builder()
//!         .timeout(Duration::from_secs(5))
//!         .build()?;
//!
//!     let request = GetRequest::new("https://api.open-meteo.com/v1/forecast")
//!         .with_query_param("latitude", "51.5074")
//!         .with_query_param("longitude", "-0.1278")
//!         .with_query_param("current_weather", "true");
//!
//!     match executor.execute::<serde_json::Value>(request).await {
//!         Ok(response) => {
//!             let report = response.validate(&[
//!                 "current_weather.temperature",
//!                 "current_weather.windspeed",
//!             ]);
//!             if report.is_valid() {
//!                 println!("{}", response.data["current_weather"]);
//!             } else {
//!                 eprintln!("Unexpected payload, {}", report);
//!             }
//!         }
//!         Err(e) => match e.kind() {
//!             ErrorKind::ConnectionFailure => eprintln!("Check your internet connection."),
//!             ErrorKind::Timeout => eprintln!("{}", e),
//!             ErrorKind::HttpStatus => eprintln!("Server answered {:?}", e.status_code()),
//!             ErrorKind::Malformed => eprintln!("Response was not valid JSON"),
//!             ErrorKind::Unknown => eprintln!("Request failed: {}", e),
//!         },
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Failure classification
//!
//! | Kind | When |
//! |------|------|
//! | `ConnectionFailure` | the server could not be reached |
//! | `Timeout` | no complete response within the timeout |
//! | `HttpStatus` | status code 400 or above |
//! | `Malformed` | the body does not decode into the requested type |
//! | `Unknown` | any other transport failure, e.g. an unparseable URL |
//!
//! ## Retries
//!
//! Retries are off by default. When enabled they are always bounded, and only
//! connection failures and timeouts are ever retried:
//!
//! ```no_run
//! use safecall::{Executor, RetryStrategy};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), safecall::ConfigError> {
//! let executor = Executor::builder()
//!     .retry_strategy(RetryStrategy::Fixed {
//!         delay: Duration::from_secs(1),
//!         max_attempts: 3,
//!     })
//!     .build()?;
//! # Ok(())
//! # }
//! ```

mod error;
mod executor;
mod request;
mod response;
pub mod retry;
pub mod transport;
pub mod validate;

pub use error::{ApiError, ConfigError, ErrorKind, Result};
pub use executor::{Executor, ExecutorBuilder, DEFAULT_TIMEOUT};
pub use request::GetRequest;
pub use response::Response;
pub use retry::{RetryPredicate, RetryStrategy};
pub use validate::{validate, ValidationReport};
