//! Health check routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/health | GET | Liveness |
//! | /api/health/detailed | GET | Liveness plus database probe |
//!
//! ```json
//! {
//!   "status": "OK",
//!   "message": "Aurora property management API is running",
//!   "timestamp": "2025-01-01T00:00:00.000Z",
//!   "environment": "development",
//!   "version": "0.1.0"
//! }
//! ```

use std::time::{Instant, SystemTime};

use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;
use serde::Serialize;

use crate::core::ServerState;
use crate::db::models::serde_helpers::format_datetime;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/health/detailed", get(detailed_health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    message: &'static str,
    timestamp: String,
    environment: String,
    version: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedHealthResponse {
    #[serde(flatten)]
    base: HealthResponse,
    /// Seconds since the first health request
    uptime_seconds: u64,
    checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    database: CheckResult,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl CheckResult {
    fn ok(latency_ms: u64) -> Self {
        Self {
            status: "ok",
            latency_ms: Some(latency_ms),
            message: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            latency_ms: None,
            message: Some(message.into()),
        }
    }
}

static START_TIME: std::sync::OnceLock<SystemTime> = std::sync::OnceLock::new();

fn uptime_seconds() -> u64 {
    let start = START_TIME.get_or_init(SystemTime::now);
    SystemTime::now()
        .duration_since(*start)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn base_response(state: &ServerState) -> HealthResponse {
    HealthResponse {
        status: "OK",
        message: "Aurora property management API is running",
        timestamp: format_datetime(&Utc::now()),
        environment: state.config.environment.clone(),
        version: env!("CARGO_PKG_VERSION"),
    }
}

/// GET /api/health
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    START_TIME.get_or_init(SystemTime::now);
    Json(base_response(&state))
}

/// GET /api/health/detailed
pub async fn detailed_health(State(state): State<ServerState>) -> Json<DetailedHealthResponse> {
    let started = Instant::now();
    let database = match state.db.query("RETURN 1").await {
        Ok(_) => CheckResult::ok(started.elapsed().as_millis() as u64),
        Err(e) => {
            tracing::error!(error = %e, "Database health probe failed");
            CheckResult::error(format!("Database error: {e}"))
        }
    };

    let mut base = base_response(&state);
    if database.status != "ok" {
        base.status = "DEGRADED";
    }

    Json(DetailedHealthResponse {
        base,
        uptime_seconds: uptime_seconds(),
        checks: HealthChecks { database },
    })
}
