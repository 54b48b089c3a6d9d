use httpmock::prelude::*;
use product_pages::domain::ports::ProductSource;
use product_pages::{ApiSource, GeneratorError, RetryPolicy};
use serde_json::json;
use std::time::Duration;

const PATH: &str = "/api/products/landing/pages";

fn source(server: &MockServer, page_size: usize, max_pages: Option<usize>, retries: u32) -> ApiSource {
    ApiSource::new(
        server.url(PATH),
        "secret_token".to_string(),
        page_size,
        max_pages,
        RetryPolicy::new(retries, 1),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_follows_total_pages_with_bearer_auth() {
    let server = MockServer::start();

    let page1 = server.mock(|when, then| {
        when.method(GET)
            .path(PATH)
            .query_param("page", "1")
            .query_param("limit", "2")
            .header("authorization", "Bearer secret_token");
        then.status(200).json_body(json!({
            "data": [{"id": 1, "name": "Uno"}, {"id": 2, "name": "Dos"}],
            "pagination": {"page": 1, "totalPages": 2, "total": 3}
        }));
    });
    let page2 = server.mock(|when, then| {
        when.method(GET)
            .path(PATH)
            .query_param("page", "2")
            .query_param("limit", "2")
            .header("authorization", "Bearer secret_token");
        then.status(200).json_body(json!({
            "data": [{"id": 3, "name": "Tres"}],
            "pagination": {"page": 2, "totalPages": 2, "total": 3}
        }));
    });

    let records = source(&server, 2, None, 0).fetch().await.unwrap();

    page1.assert();
    page2.assert();
    assert_eq!(records.len(), 3);
    assert_eq!(records[2]["name"], "Tres");
}

#[tokio::test]
async fn test_max_pages_caps_requests() {
    let server = MockServer::start();
    let page1 = server.mock(|when, then| {
        when.method(GET).path(PATH).query_param("page", "1");
        then.status(200).json_body(json!({
            "data": [{"id": 1, "name": "Uno"}],
            "pagination": {"totalPages": 50}
        }));
    });
    let page2 = server.mock(|when, then| {
        when.method(GET).path(PATH).query_param("page", "2");
        then.status(200).json_body(json!({"data": [{"id": 2, "name": "Dos"}]}));
    });

    let records = source(&server, 1, Some(1), 0).fetch().await.unwrap();

    page1.assert();
    page2.assert_hits(0);
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_short_page_without_pagination_ends_fetch() {
    let server = MockServer::start();
    let page1 = server.mock(|when, then| {
        when.method(GET).path(PATH).query_param("page", "1");
        then.status(200)
            .json_body(json!([{"id": 1, "name": "Uno"}, {"id": 2, "name": "Dos"}]));
    });

    let records = source(&server, 10, None, 0).fetch().await.unwrap();

    page1.assert();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_has_next_false_stops() {
    let server = MockServer::start();
    let page1 = server.mock(|when, then| {
        when.method(GET).path(PATH).query_param("page", "1");
        then.status(200).json_body(json!({
            "data": [{"id": 1, "name": "Uno"}],
            "pagination": {"hasNextPage": false}
        }));
    });

    let records = source(&server, 1, None, 0).fetch().await.unwrap();
    page1.assert();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_retryable_status_exhausts_retries() {
    let server = MockServer::start();
    let unavailable = server.mock(|when, then| {
        when.method(GET).path(PATH);
        then.status(503).body("maintenance");
    });

    let err = source(&server, 10, None, 2).fetch().await.unwrap_err();

    unavailable.assert_hits(3);
    match err {
        GeneratorError::RetriesExhausted {
            status, attempts, ..
        } => {
            assert_eq!(status, 503);
            assert_eq!(attempts, 3);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_retry_after_header_is_honoured() {
    let server = MockServer::start();
    let limited = server.mock(|when, then| {
        when.method(GET).path(PATH);
        then.status(429).header("Retry-After", "0");
    });

    let started = std::time::Instant::now();
    let err = source(&server, 10, None, 1).fetch().await.unwrap_err();

    limited.assert_hits(2);
    assert!(matches!(err, GeneratorError::RetriesExhausted { status: 429, .. }));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_non_retryable_status_fails_immediately() {
    let server = MockServer::start();
    let unauthorized = server.mock(|when, then| {
        when.method(GET).path(PATH);
        then.status(401).body("{\"error\":\"invalid token\"}");
    });

    let err = source(&server, 10, None, 5).fetch().await.unwrap_err();

    unauthorized.assert_hits(1);
    match err {
        GeneratorError::ApiStatusError { status, body, .. } => {
            assert_eq!(status, 401);
            assert!(body.contains("invalid token"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_json_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(PATH);
        then.status(200).body("<html>not json</html>");
    });

    let err = source(&server, 10, None, 0).fetch().await.unwrap_err();
    assert!(matches!(err, GeneratorError::InvalidResponse { .. }));
}
