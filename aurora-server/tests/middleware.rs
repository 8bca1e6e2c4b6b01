//! Rate limiting, CORS and body limits on the assembled router

mod common;

use aurora_server::{Config, build_router};
use axum::Router;
use axum::body::Body;
use common::memory_state;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

async fn app_with(config: Config) -> Router {
    build_router(memory_state(config).await)
}

fn from_ip(ip: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-forwarded-for", ip)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_rate_limit_per_client() {
    let mut config = Config::in_memory();
    config.rate_limit_max_requests = 2;
    let app = app_with(config).await;

    for _ in 0..2 {
        let response = app.clone().oneshot(from_ip("10.0.0.1", "/api/tenants")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.clone().oneshot(from_ip("10.0.0.1", "/api/tenants")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "Too many requests from this IP, please try again later."
    );

    // another client still has its own budget
    let response = app.clone().oneshot(from_ip("10.0.0.2", "/api/tenants")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let app = app_with(Config::in_memory()).await;

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/tenants")
        .header(header::ORIGIN, "http://localhost:5500")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:5500"
    );

    let request = Request::builder()
        .uri("/api/health")
        .header(header::ORIGIN, "http://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let mut config = Config::in_memory();
    config.body_limit_bytes = 64;
    let app = app_with(config).await;

    let payload = format!(r#"{{"name":"{}"}}"#, "x".repeat(200));
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/tenants")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, payload.len())
        .body(Body::from(payload))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let app = app_with(Config::in_memory()).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/maintenance")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], 2);
}
