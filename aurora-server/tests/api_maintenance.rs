//! Maintenance routes driven through the full router

mod common;

use chrono::{Duration, Utc};
use common::*;
use http::StatusCode;
use serde_json::{Value, json};

/// Reported an hour short of `reported_days_ago` whole days
fn request_payload(apartment: &str, priority: &str, reported_days_ago: i64) -> Value {
    let reported = Utc::now() - Duration::days(reported_days_ago) + Duration::hours(1);
    json!({
        "apartmentNumber": apartment,
        "type": "plumbing",
        "description": "Leaking tap in the kitchen",
        "priority": priority,
        "reportedDate": reported.to_rfc3339(),
        "estimatedCost": 40.0,
    })
}

async fn create(app: &axum::Router, apartment: &str, priority: &str, days_ago: i64) -> String {
    let payload = request_payload(apartment, priority, days_ago);
    let (status, body) = post(app, "/api/maintenance", payload).await;
    assert_eq!(status, StatusCode::CREATED);
    key(&body["data"]["id"])
}

fn ids(body: &Value) -> Vec<String> {
    body["data"].as_array().unwrap().iter().map(|r| key(&r["id"])).collect()
}

fn field<'a>(body: &'a Value, name: &str) -> Vec<&'a str> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r[name].as_str())
        .collect()
}

#[tokio::test]
async fn test_create_request_defaults() {
    let (app, _) = test_app().await;

    let (status, body) = post(
        &app,
        "/api/maintenance",
        json!({ "apartmentNumber": "A1", "type": "electrical", "description": "No power" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let data = &body["data"];
    assert_eq!(data["type"], "electrical");
    assert_eq!(data["status"], "pending");
    assert_eq!(data["priority"], "medium");
    assert_eq!(data["isOverdue"], false);
    assert!(data["resolutionTime"].is_null());
}

#[tokio::test]
async fn test_create_request_validation() {
    let (app, _) = test_app().await;

    let (status, body) = post(&app, "/api/maintenance", json!({ "apartmentNumber": "A1" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().unwrap();
    assert!(errors.contains(&json!("Maintenance type is required")));
    assert!(errors.contains(&json!("Description is required")));

    let (status, _) = post(
        &app,
        "/api/maintenance",
        json!({ "apartmentNumber": "A1", "type": "gardening", "description": "x" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_assign_then_complete() {
    let (app, _) = test_app().await;
    let id = create(&app, "B2", "high", 2).await;

    let (status, body) = patch(
        &app,
        &format!("/api/maintenance/{id}/assign"),
        Some(json!({ "assignedTo": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0], "Assigned to is required");

    let (status, body) = patch(
        &app,
        &format!("/api/maintenance/{id}/assign"),
        Some(json!({ "assignedTo": " Sam " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Maintenance request assigned successfully");
    assert_eq!(body["data"]["assignedTo"], "Sam");
    assert_eq!(body["data"]["status"], "in-progress");

    let (status, body) = patch(
        &app,
        &format!("/api/maintenance/{id}/complete"),
        Some(json!({ "actualCost": 55.5, "notes": "Washer replaced" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Maintenance request marked as completed");
    let data = &body["data"];
    assert_eq!(data["status"], "completed");
    assert_eq!(data["actualCost"], 55.5);
    assert_eq!(data["notes"], "Washer replaced");
    assert_eq!(data["resolutionTime"], 2);
    assert_eq!(data["isOverdue"], false);

    // closed requests cannot be reassigned
    let (status, body) = patch(
        &app,
        &format!("/api/maintenance/{id}/assign"),
        Some(json!({ "assignedTo": "Kim" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 2002);
}

#[tokio::test]
async fn test_complete_without_body() {
    let (app, _) = test_app().await;
    let id = create(&app, "C3", "low", 1).await;

    let (status, body) = patch(&app, &format!("/api/maintenance/{id}/complete"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["actualCost"], 0.0);
    assert!(body["data"]["completedDate"].is_string());
}

#[tokio::test]
async fn test_missing_request_is_404() {
    let (app, _) = test_app().await;

    let (status, body) = patch(&app, "/api/maintenance/nope/complete", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Maintenance request not found");

    let (status, _) = delete(&app, "/api/maintenance/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_queues_and_overview() {
    let (app, _) = test_app().await;

    let low = create(&app, "101", "low", 20).await;
    let urgent_old = create(&app, "102", "urgent", 3).await;
    let urgent_new = create(&app, "101", "urgent", 1).await;
    let done = create(&app, "103", "medium", 9).await;

    let (status, _) = patch(
        &app,
        &format!("/api/maintenance/{done}/complete"),
        Some(json!({ "actualCost": 120.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // pending: urgent first, oldest report first within a priority
    let (_, body) = get(&app, "/api/maintenance/status/pending").await;
    assert_eq!(ids(&body), vec![urgent_old.clone(), urgent_new.clone(), low]);
    assert_eq!(body["data"][0]["isOverdue"], true);

    let (_, body) = get(&app, "/api/maintenance/priority/urgent").await;
    assert_eq!(ids(&body), vec![urgent_old, urgent_new]);

    let (_, body) = get(&app, "/api/maintenance/status/completed?limit=5").await;
    assert_eq!(body["pagination"]["totalItems"], 1);
    assert_eq!(key(&body["data"][0]["id"]), done);

    let (_, body) = get(&app, "/api/maintenance/apartment/101").await;
    assert_eq!(field(&body, "priority"), vec!["urgent", "low"]);

    let (_, body) = get(&app, "/api/maintenance?priority=urgent&apartmentNumber=101").await;
    assert_eq!(body["pagination"]["totalItems"], 1);

    let (_, body) = get(&app, "/api/maintenance?status=completed").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = get(&app, "/api/maintenance/stats/overview").await;
    assert_eq!(status, StatusCode::OK);
    let stats = &body["data"];
    assert_eq!(stats["totalRequests"], 4);
    assert_eq!(stats["pendingRequests"], 3);
    assert_eq!(stats["completedRequests"], 1);
    assert_eq!(stats["urgentRequests"], 2);
    assert_eq!(stats["totalCost"], 120.0);
    // only the low priority request is open and older than a week
    assert_eq!(stats["overdueRequests"], 1);
}

#[tokio::test]
async fn test_update_and_delete_request() {
    let (app, _) = test_app().await;
    let id = create(&app, "D4", "medium", 1).await;

    let (status, body) = put(
        &app,
        &format!("/api/maintenance/{id}"),
        json!({ "priority": "high", "damages": "Cracked tile" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["priority"], "high");
    assert_eq!(body["data"]["damages"], "Cracked tile");
    assert_eq!(body["data"]["apartmentNumber"], "D4");

    let (status, body) = delete(&app, &format!("/api/maintenance/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Maintenance request deleted successfully");

    let (status, _) = get(&app, &format!("/api/maintenance/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
