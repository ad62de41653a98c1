// ABOUTME: Integration tests for per-client rate limiting on the /api routes
// ABOUTME: Quota exhaustion, header emission, client isolation and unlimited health checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use helpers::axum_test::AxumTestRequest;
use helpers::test_utils::{default_app, test_app, test_config, SpyProvider};
use serde_json::{json, Value};

const CLIENT: &str = "203.0.113.7:4000";

#[tokio::test]
async fn test_101st_request_in_window_is_limited() {
    let spy = SpyProvider::replying("ok");
    let app = default_app(spy.clone());

    for i in 0..100 {
        let response = AxumTestRequest::post("/api/chat")
            .from_peer(CLIENT)
            .json(&json!({"message": format!("message {i}")}))
            .send(app.clone())
            .await;
        assert_eq!(response.status(), 200, "request {i} should pass");
    }

    let response = AxumTestRequest::post("/api/chat")
        .from_peer(CLIENT)
        .json(&json!({"message": "one too many"}))
        .send(app)
        .await;

    assert_eq!(response.status(), 429);
    assert_eq!(response.header("ratelimit-limit"), Some("100"));
    assert_eq!(response.header("ratelimit-remaining"), Some("0"));
    let retry_after: u64 = response.header("retry-after").unwrap().parse().unwrap();
    assert!(retry_after > 0 && retry_after <= 15 * 60);

    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Too many requests. Please try again later.");
    assert_eq!(spy.calls(), 100);
}

#[tokio::test]
async fn test_allowed_requests_carry_quota_headers() {
    let app = default_app(SpyProvider::replying("ok"));

    let first = AxumTestRequest::get("/api/languages")
        .from_peer(CLIENT)
        .send(app.clone())
        .await;
    assert_eq!(first.status(), 200);
    assert_eq!(first.header("ratelimit-limit"), Some("100"));
    assert_eq!(first.header("ratelimit-remaining"), Some("99"));
    assert!(first.header("ratelimit-reset").is_some());
    assert!(first.header("retry-after").is_none());

    let second = AxumTestRequest::get("/api/languages")
        .from_peer(CLIENT)
        .send(app)
        .await;
    assert_eq!(second.header("ratelimit-remaining"), Some("98"));
}

#[tokio::test]
async fn test_clients_are_counted_separately() {
    let app = test_app(
        SpyProvider::replying("ok"),
        test_config(&[("RATE_LIMIT_MAX_REQUESTS", "2")]),
    );

    for _ in 0..2 {
        let response = AxumTestRequest::get("/api/languages")
            .from_peer(CLIENT)
            .send(app.clone())
            .await;
        assert_eq!(response.status(), 200);
    }
    let limited = AxumTestRequest::get("/api/languages")
        .from_peer(CLIENT)
        .send(app.clone())
        .await;
    assert_eq!(limited.status(), 429);

    let other = AxumTestRequest::get("/api/languages")
        .from_peer("198.51.100.20:5000")
        .send(app)
        .await;
    assert_eq!(other.status(), 200);
}

#[tokio::test]
async fn test_forwarded_address_is_used_without_peer() {
    let app = test_app(
        SpyProvider::replying("ok"),
        test_config(&[("RATE_LIMIT_MAX_REQUESTS", "1")]),
    );

    let first = AxumTestRequest::get("/api/languages")
        .header("x-forwarded-for", "192.0.2.1, 10.0.0.1")
        .send(app.clone())
        .await;
    assert_eq!(first.status(), 200);

    let second = AxumTestRequest::get("/api/languages")
        .header("x-forwarded-for", "192.0.2.1")
        .send(app.clone())
        .await;
    assert_eq!(second.status(), 429);

    let different = AxumTestRequest::get("/api/languages")
        .header("x-forwarded-for", "192.0.2.2")
        .send(app)
        .await;
    assert_eq!(different.status(), 200);
}

#[tokio::test]
async fn test_health_and_unknown_routes_are_not_limited() {
    let app = test_app(
        SpyProvider::replying("ok"),
        test_config(&[("RATE_LIMIT_MAX_REQUESTS", "1")]),
    );

    for _ in 0..5 {
        let health = AxumTestRequest::get("/health")
            .from_peer(CLIENT)
            .send(app.clone())
            .await;
        assert_eq!(health.status(), 200);
        assert!(health.header("ratelimit-limit").is_none());

        let missing = AxumTestRequest::get("/api/missing")
            .from_peer(CLIENT)
            .send(app.clone())
            .await;
        assert_eq!(missing.status(), 404);
    }
}
