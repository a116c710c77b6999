//! Example demonstrating bounded retry strategies.
//!
//! This example shows how to:
//! - Make a single attempt (the default)
//! - Retry transient failures with a fixed delay
//! - Retry with exponential backoff
//! - Narrow retries to timeouts with a predicate
//! - See that HTTP status errors are never retried
//!
//! Run with: `cargo run --example retry_strategies`

use safecall::retry::RetryOnTimeout;
use safecall::{Executor, GetRequest, RetryStrategy};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing to see each attempt
    tracing_subscriber::fmt()
        .with_env_filter("safecall=info,retry_strategies=info")
        .init();

    println!("=== No Retry Strategy ===");
    let single = Executor::builder().build()?;
    match single
        .get::<serde_json::Value>("https://this-domain-does-not-exist-12345.com/api")
        .await
    {
        Ok(_) => println!("Unexpected success"),
        Err(e) => println!("Failed after one attempt: {} ({})", e, e.kind()),
    }
    println!();

    println!("=== Fixed Delay Strategy ===");
    println!("3 attempts, 1s apart");
    let fixed = Executor::builder()
        .retry_strategy(RetryStrategy::Fixed {
            delay: Duration::from_secs(1),
            max_attempts: 3,
        })
        .build()?;
    match fixed
        .get::<serde_json::Value>("https://this-domain-does-not-exist-12345.com/api")
        .await
    {
        Ok(_) => println!("Unexpected success"),
        Err(e) => println!("Gave up: {} ({})", e, e.kind()),
    }
    println!();

    println!("=== Exponential Backoff Strategy ===");
    println!("Delays: 200ms, 400ms (with jitter)");
    let backoff = Executor::builder()
        .retry_strategy(RetryStrategy::ExponentialBackoff {
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
            max_attempts: 3,
            jitter: true,
        })
        .retry_predicate(Box::new(RetryOnTimeout))
        .build()?;
    let slow = GetRequest::new("https://httpstat.us/200?sleep=5000")
        .with_timeout(Duration::from_secs(1))?;
    match backoff.execute::<serde_json::Value>(slow).await {
        Ok(response) => println!("Succeeded after {} attempt(s)", response.attempts),
        Err(e) => println!("Gave up: {}", e),
    }
    println!();

    println!("=== HTTP Status Errors Are Not Retried ===");
    match backoff
        .get::<serde_json::Value>("https://jsonplaceholder.typicode.com/posts/99999")
        .await
    {
        Ok(_) => println!("Unexpected success"),
        Err(e) => println!("Failed once, no retry: {} (status {:?})", e, e.status_code()),
    }

    Ok(())
}
