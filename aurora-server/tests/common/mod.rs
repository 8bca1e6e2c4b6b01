//! Shared fixtures for integration tests
#![allow(dead_code)]

use aurora_server::db::DbService;
use aurora_server::{Config, ServerState, build_router};
use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// Fresh in-memory database with the schema applied
pub async fn memory_state(config: Config) -> ServerState {
    let service = DbService::open(&config).await.unwrap();
    ServerState::new(config, service.db)
}

pub async fn test_state() -> ServerState {
    memory_state(Config::in_memory()).await
}

pub async fn test_app() -> (Router, ServerState) {
    let state = test_state().await;
    (build_router(state.clone()), state)
}

/// Send one request through the router and decode the JSON body
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "PUT", uri, Some(body)).await
}

pub async fn patch(app: &Router, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send(app, "PATCH", uri, body).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "DELETE", uri, None).await
}

/// Record key from an id like `tenant:abc`
pub fn key(id: &Value) -> String {
    let raw = id.as_str().unwrap();
    raw.split_once(':').map(|(_, k)| k).unwrap_or(raw).to_string()
}
