//! Integration tests for the URL shortener API
//!
//! These tests verify the entire application stack including:
//! - HTTP routing
//! - Request/response handling
//! - Registry and click recording
//! - Error handling

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use shortcode::clock::ManualClock;
use shortcode::config::Config;
use shortcode::registry::Registry;
use shortcode::route::create_app;
use shortcode::state::AppState;

/// Helper function to create a test application driven by a manual clock
fn setup_test_app() -> (axum::Router, ManualClock) {
    let clock = ManualClock::default();
    let registry = Registry::new(Arc::new(clock.clone()));
    let state = AppState::with_registry(registry, Config::default());

    (create_app(state), clock)
}

/// Helper function to parse response body as JSON
async fn response_json(body: Body) -> Value {
    let bytes = body
        .collect()
        .await
        .expect("Failed to read response body")
        .to_bytes();

    serde_json::from_slice(&bytes).expect("Failed to parse JSON")
}

fn create_request(payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/shorturls")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_create_short_url_success() {
    let (app, _clock) = setup_test_app();

    let payload = json!({
        "url": "https://example.com/test",
        "validity": 60,
        "shortcode": "test123"
    });

    let response = app.oneshot(create_request(payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["shortLink"], "http://localhost:8000/test123");
    assert_eq!(body["message"], "Short URL created successfully");
    assert!(body["expiry"].is_string());
}

#[tokio::test]
async fn test_create_short_url_random_shortcode() {
    let (app, _clock) = setup_test_app();

    let payload = json!({ "url": "https://example.com/public" });

    let response = app.oneshot(create_request(payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response.into_body()).await;
    let short_link = body["shortLink"].as_str().unwrap();
    let shortcode = short_link.rsplit('/').next().unwrap();
    assert_eq!(shortcode.len(), 6); // Random 6-char shortcode
    assert!(shortcode.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[tokio::test]
async fn test_create_empty_shortcode_is_random() {
    let (app, _clock) = setup_test_app();

    let payload = json!({ "url": "https://example.com", "shortcode": "" });

    let response = app.oneshot(create_request(payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_short_url_duplicate_shortcode() {
    let (app, _clock) = setup_test_app();

    let payload = json!({
        "url": "https://example.com/first",
        "shortcode": "duplicate"
    });

    // First creation should succeed
    let response = app
        .clone()
        .oneshot(create_request(payload.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Second creation with same shortcode should fail
    let response = app.oneshot(create_request(payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = response_json(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "This shortcode is already taken, please try a different one"
    );
}

#[tokio::test]
async fn test_create_rejects_invalid_input() {
    let (app, _clock) = setup_test_app();

    let cases = [
        (json!({}), "URL is required and must be a string"),
        (json!({ "url": 42 }), "URL is required and must be a string"),
        (json!({ "url": "not a url" }), "Invalid URL format"),
        (json!({ "url": "example.com/no-scheme" }), "Invalid URL format"),
        (
            json!({ "url": format!("https://example.com/{}", "a".repeat(2048)) }),
            "URL too long (max 2048 characters)",
        ),
        (
            json!({ "url": "https://example.com", "validity": 0 }),
            "Validity must be a positive integer",
        ),
        (
            json!({ "url": "https://example.com", "validity": "30" }),
            "Validity must be a positive integer",
        ),
        (
            json!({ "url": "https://example.com", "validity": 525601 }),
            "Validity cannot exceed 1 year (525600 minutes)",
        ),
        (
            json!({ "url": "https://example.com", "shortcode": "ab" }),
            "Shortcode must be 3-10 characters long",
        ),
        (
            json!({ "url": "https://example.com", "shortcode": "has-dash" }),
            "Shortcode must contain only alphanumeric characters",
        ),
        (
            json!({ "url": "https://example.com", "shortcode": 12345 }),
            "Shortcode must be a string",
        ),
    ];

    for (payload, message) in cases {
        let response = app.clone().oneshot(create_request(payload)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response.into_body()).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], message);
    }
}

#[tokio::test]
async fn test_create_float_validity_and_falsy_shortcode() {
    let (app, _clock) = setup_test_app();

    let payload = json!({ "url": "https://example.com", "validity": 30.0, "shortcode": false });

    let response = app.oneshot(create_request(payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response.into_body()).await;
    let shortcode = body["shortLink"].as_str().unwrap().rsplit('/').next().unwrap();
    assert_eq!(shortcode.len(), 6);
}

#[tokio::test]
async fn test_create_exhausted_codespace() {
    let registry = Registry::new(Arc::new(ManualClock::default()))
        .with_code_generator(|| "same01".to_string());
    let app = create_app(AppState::with_registry(registry, Config::default()));

    let payload = json!({ "url": "https://example.com/first" });
    let response = app
        .clone()
        .oneshot(create_request(payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // every generated code is now taken
    let payload = json!({ "url": "https://example.com/second" });
    let response = app.oneshot(create_request(payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "Something went wrong while creating your short URL"
    );
}

#[tokio::test]
async fn test_create_invalid_json() {
    let (app, _clock) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/shorturls")
                .header("content-type", "application/json")
                .body(Body::from("{ not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_redirect_url_success() {
    let (app, _clock) = setup_test_app();

    // First, create a short URL
    let create_payload = json!({
        "url": "https://example.com/redirect-test",
        "shortcode": "redirect1"
    });
    app.clone()
        .oneshot(create_request(create_payload))
        .await
        .unwrap();

    // Now test the redirect
    let response = app.oneshot(get_request("/redirect1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get("location").unwrap(),
        "https://example.com/redirect-test"
    );
}

#[tokio::test]
async fn test_redirect_url_not_found() {
    let (app, _clock) = setup_test_app();

    let response = app.oneshot(get_request("/nonexistent")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["message"], "This link has expired or does not exist");
}

#[tokio::test]
async fn test_redirect_expired_link() {
    let (app, clock) = setup_test_app();

    app.clone()
        .oneshot(create_request(json!({
            "url": "https://example.com/brief",
            "validity": 1,
            "shortcode": "brief"
        })))
        .await
        .unwrap();

    let response = app.clone().oneshot(get_request("/brief")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    clock.advance(Duration::minutes(2));

    let response = app.clone().oneshot(get_request("/brief")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // statistics survive expiry
    let response = app.oneshot(get_request("/shorturls/brief")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response.into_body()).await;
    assert_eq!(body["data"]["isActive"], false);
    assert_eq!(body["data"]["totalClicks"], 1);
}

#[tokio::test]
async fn test_stats_before_and_after_click() {
    let (app, _clock) = setup_test_app();

    app.clone()
        .oneshot(create_request(json!({
            "url": "https://example.com/a",
            "validity": 30,
            "shortcode": "abc123"
        })))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get_request("/shorturls/abc123"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["shortcode"], "abc123");
    assert_eq!(body["data"]["originalUrl"], "https://example.com/a");
    assert_eq!(body["data"]["totalClicks"], 0);
    assert_eq!(body["data"]["isActive"], true);
    assert_eq!(body["data"]["clickDetails"], json!([]));

    app.clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/abc123")
                .header("referer", "https://news.example.org")
                .header("user-agent", "test-agent/1.0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let response = app.oneshot(get_request("/shorturls/abc123")).await.unwrap();
    let body = response_json(response.into_body()).await;

    assert_eq!(body["data"]["totalClicks"], 1);
    let click = &body["data"]["clickDetails"][0];
    assert_eq!(click["referrer"], "https://news.example.org");
    assert_eq!(click["userAgent"], "test-agent/1.0");
    // no peer address in tests, so the loopback fallback applies
    assert_eq!(click["location"], "local");
    assert!(click["timestamp"].is_string());
    assert!(click.get("ip").is_none());
}

#[tokio::test]
async fn test_click_defaults_and_forwarded_address() {
    let (app, _clock) = setup_test_app();

    app.clone()
        .oneshot(create_request(json!({
            "url": "https://example.com/b",
            "shortcode": "fwd123"
        })))
        .await
        .unwrap();

    app.clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/fwd123")
                .header("x-forwarded-for", "8.8.8.8, 10.0.0.1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let response = app.oneshot(get_request("/shorturls/fwd123")).await.unwrap();
    let body = response_json(response.into_body()).await;

    let click = &body["data"]["clickDetails"][0];
    assert_eq!(click["referrer"], "direct");
    assert_eq!(click["userAgent"], "unknown");
    // public address, but no GeoIP database configured
    assert_eq!(click["location"], "unknown");
}

#[tokio::test]
async fn test_stats_not_found() {
    let (app, _clock) = setup_test_app();

    let response = app.oneshot(get_request("/shorturls/missing")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Short URL not found");
}

#[tokio::test]
async fn test_unknown_route() {
    let (app, _clock) = setup_test_app();

    let response = app.oneshot(get_request("/a/b/c")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["message"], "Page not found");
}
