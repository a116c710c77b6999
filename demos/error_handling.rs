//! Example walking through each failure classification and payload validation.
//!
//! This example shows how to:
//! - Branch on `ErrorKind` for a valid URL, a 404, an invalid domain and a timeout
//! - Validate a user payload before reading its fields
//! - Gate access to nested ticker fields on a validation report
//!
//! Run with: `cargo run --example error_handling`

use safecall::{ApiError, ErrorKind, Executor, GetRequest};
use std::time::Duration;

fn describe(error: &ApiError) -> String {
    match error.kind() {
        ErrorKind::ConnectionFailure => "Connection failed. Check your internet.".to_string(),
        ErrorKind::Timeout => error.to_string(),
        ErrorKind::HttpStatus => format!("HTTP error: {:?}", error.status_code()),
        ErrorKind::Malformed => "Response is not valid JSON".to_string(),
        ErrorKind::Unknown => format!("Request failed: {}", error),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("safecall=info")
        .init();

    let executor = Executor::builder().build()?;

    println!("=== Classification Scenarios ===");
    let scenarios = [
        ("Valid URL", "https://jsonplaceholder.typicode.com/posts/1", None),
        ("Missing resource (404)", "https://jsonplaceholder.typicode.com/posts/99999", None),
        ("Invalid domain", "https://this-domain-does-not-exist-12345.com/api", None),
        ("Timeout", "https://httpstat.us/200?sleep=5000", Some(Duration::from_secs(1))),
    ];

    for (label, url, timeout) in scenarios {
        let mut request = GetRequest::new(url);
        if let Some(timeout) = timeout {
            request = request.with_timeout(timeout)?;
        }

        match executor.execute::<serde_json::Value>(request).await {
            Ok(response) => {
                let title = response.data["title"].as_str().unwrap_or_default();
                println!("{}: success, title = {:.30}", label, title);
            }
            Err(e) => println!("{}: {} ({})", label, describe(&e), e.kind()),
        }
    }
    println!();

    println!("=== Validating a User Payload ===");
    match executor
        .get::<serde_json::Value>("https://jsonplaceholder.typicode.com/users/1")
        .await
    {
        Ok(user) => {
            let report = user.validate(&["name", "email", "phone"]);
            if report.is_valid() {
                println!("Name: {}", user.data["name"]);
                println!("Email: {}", user.data["email"]);
                println!("Phone: {}", user.data["phone"]);
            } else {
                println!("Warning: {}", report);
            }
        }
        Err(e) => println!("Error: {}", describe(&e)),
    }
    println!();

    println!("=== Ticker With Validation ===");
    match executor
        .get::<serde_json::Value>("https://api.coinpaprika.com/v1/tickers/btc-bitcoin")
        .await
    {
        Ok(ticker) => {
            let report = ticker.validate(&[
                "name",
                "symbol",
                "quotes.USD.price",
                "quotes.USD.percent_change_24h",
            ]);
            if report.is_valid() {
                let usd = &ticker.data["quotes"]["USD"];
                println!("{} ({})", ticker.data["name"], ticker.data["symbol"]);
                println!("Price: ${:.2}", usd["price"].as_f64().unwrap_or_default());
                println!(
                    "24h Change: {:+.2}%",
                    usd["percent_change_24h"].as_f64().unwrap_or_default()
                );
            } else {
                println!("Unexpected ticker payload, {}", report);
            }
        }
        Err(e) => {
            println!("Error: {}", describe(&e));
            println!("Tip: Try 'btc-bitcoin' or 'eth-ethereum'");
        }
    }

    Ok(())
}
