//! Integration tests using wiremock to simulate HTTP servers.

use safecall::{ErrorKind, Executor, GetRequest, RetryStrategy};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Post {
    id: u32,
    title: String,
}

fn sample_post() -> Post {
    Post {
        id: 1,
        title: "sunt aut facere".to_string(),
    }
}

#[tokio::test]
async fn test_successful_get_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_post()))
        .mount(&mock_server)
        .await;

    let executor = Executor::builder().build().unwrap();

    let response = executor
        .get::<Post>(format!("{}/posts/1", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(response.data, sample_post());
    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(response.attempts, 1);
    assert!(!response.was_retried());
    assert!(response.raw_body.contains("sunt aut facere"));
}

#[tokio::test]
async fn test_http_error_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts/99999"))
        .respond_with(ResponseTemplate::new(404).set_body_string("{}"))
        .mount(&mock_server)
        .await;

    let executor = Executor::builder().build().unwrap();

    let err = executor
        .get::<Post>(format!("{}/posts/99999", mock_server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::HttpStatus);
    assert_eq!(err.status_code(), Some(404));
    assert_eq!(err.message(), "HTTP error 404");
    assert_eq!(err.raw_response(), Some("{}"));
}

#[tokio::test]
async fn test_redirect_is_followed_to_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old/posts/1"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}/posts/1", mock_server.uri()).as_str()),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/posts/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_post()))
        .mount(&mock_server)
        .await;

    let executor = Executor::builder().build().unwrap();

    let response = executor
        .get::<Post>(format!("{}/old/posts/1", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(response.data, sample_post());
}

#[tokio::test]
async fn test_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let executor = Executor::builder().build().unwrap();

    let err = executor
        .get::<serde_json::Value>(format!("{}/posts/1", mock_server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Malformed);
    assert_eq!(err.status_code(), None);
    assert_eq!(err.raw_response(), Some("<html>oops</html>"));
    assert!(err.detail().is_some());
}

#[tokio::test]
async fn test_invalid_utf8_in_json_string_is_malformed() {
    let mock_server = MockServer::start().await;

    let mut body = br#"{"title": ""#.to_vec();
    body.extend_from_slice(&[0xff, 0xfe]);
    body.extend_from_slice(br#""}"#);

    Mock::given(method("GET"))
        .and(path("/posts/1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(&mock_server)
        .await;

    let executor = Executor::builder().build().unwrap();

    let err = executor
        .get::<serde_json::Value>(format!("{}/posts/1", mock_server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[tokio::test]
async fn test_body_of_wrong_shape_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "one"})))
        .mount(&mock_server)
        .await;

    let executor = Executor::builder().build().unwrap();

    let err = executor
        .get::<Post>(format!("{}/posts/1", mock_server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(sample_post())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let executor = Executor::builder()
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let err = executor
        .get::<Post>(format!("{}/slow", mock_server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(err.message().contains("100ms"), "{}", err.message());
}

#[tokio::test]
async fn test_per_request_timeout_overrides_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(sample_post())
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;

    let executor = Executor::builder()
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let request = GetRequest::new(format!("{}/slow", mock_server.uri()))
        .with_timeout(Duration::from_secs(5))
        .unwrap();

    let response = executor.execute::<Post>(request).await.unwrap();
    assert_eq!(response.data, sample_post());
}

#[tokio::test]
async fn test_unreachable_port_is_connection_failure() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let executor = Executor::builder().build().unwrap();

    let err = executor
        .get::<serde_json::Value>(format!("http://127.0.0.1:{}/api", port))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConnectionFailure);
    assert_eq!(err.message(), "connection failed");
}

#[tokio::test]
async fn test_unparseable_url_is_unknown() {
    let executor = Executor::builder().build().unwrap();

    let err = executor
        .get::<serde_json::Value>("not a url")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unknown);
    assert!(err.message().contains("Invalid URL"), "{}", err.message());
}

#[tokio::test]
async fn test_query_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/todos"))
        .and(query_param("completed", "true"))
        .and(query_param("title", "a&b c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![sample_post()]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let executor = Executor::builder().build().unwrap();

    let response = executor
        .get_with_params::<Vec<Post>, _, _>(
            format!("{}/todos", mock_server.uri()),
            [("completed", "true"), ("title", "a&b c")],
        )
        .await
        .unwrap();

    assert_eq!(response.data.len(), 1);
}

#[tokio::test]
async fn test_default_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts/1"))
        .and(wiremock::matchers::header("user-agent", "safecall-tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_post()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let executor = Executor::builder()
        .default_header("User-Agent", "safecall-tests")
        .unwrap()
        .build()
        .unwrap();

    let _ = executor
        .get::<Post>(format!("{}/posts/1", mock_server.uri()))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_http_status_is_never_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let executor = Executor::builder()
        .retry_strategy(RetryStrategy::Fixed {
            delay: Duration::from_millis(10),
            max_attempts: 3,
        })
        .build()
        .unwrap();

    let err = executor
        .get::<Post>(format!("{}/flaky", mock_server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::HttpStatus);
    assert_eq!(err.status_code(), Some(503));
}

#[tokio::test]
async fn test_retry_recovers_from_timeout() {
    let mock_server = MockServer::start().await;
    let attempt_count = Arc::new(AtomicUsize::new(0));
    let attempt_count_clone = attempt_count.clone();

    // First request stalls past the timeout, second answers promptly
    Mock::given(method("GET"))
        .and(path("/posts/1"))
        .respond_with(move |_req: &wiremock::Request| {
            let count = attempt_count_clone.fetch_add(1, Ordering::SeqCst);
            let template = ResponseTemplate::new(200).set_body_json(sample_post());
            if count == 0 {
                template.set_delay(Duration::from_secs(2))
            } else {
                template
            }
        })
        .mount(&mock_server)
        .await;

    let executor = Executor::builder()
        .timeout(Duration::from_millis(200))
        .retry_strategy(RetryStrategy::Fixed {
            delay: Duration::from_millis(10),
            max_attempts: 3,
        })
        .build()
        .unwrap();

    let response = executor
        .get::<Post>(format!("{}/posts/1", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(response.data, sample_post());
    assert_eq!(response.attempts, 2);
    assert!(response.was_retried());
    assert_eq!(attempt_count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_validate_live_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tickers/btc-bitcoin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Bitcoin",
            "symbol": "BTC",
            "quotes": {"USD": {"price": 67000.5}}
        })))
        .mount(&mock_server)
        .await;

    let executor = Executor::builder().build().unwrap();

    let response = executor
        .get::<serde_json::Value>(format!("{}/v1/tickers/btc-bitcoin", mock_server.uri()))
        .await
        .unwrap();

    let report = response.validate(&["quotes.USD.price", "quotes.USD.percent_change_24h"]);
    assert_eq!(report.missing_fields(), ["quotes.USD.percent_change_24h"]);
}
