//! Per-IP fixed-window rate limiting for `/api` routes

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::core::ServerState;
use shared::AppError;

struct IpEntry {
    count: u32,
    window_start: Instant,
}

#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<HashMap<String, IpEntry>>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window,
        }
    }

    /// Returns `true` if the request is allowed, `false` if rate-limited.
    pub async fn check(&self, ip: &str) -> bool {
        let mut map = self.inner.lock().await;
        let now = Instant::now();

        let entry = map.entry(ip.to_owned()).or_insert_with(|| IpEntry {
            count: 0,
            window_start: now,
        });

        // Reset window if expired
        if now.duration_since(entry.window_start) >= self.window {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count = entry.count.saturating_add(1);
        entry.count <= self.max_requests
    }

    /// Drop entries whose window has ended
    pub async fn cleanup(&self) {
        let mut map = self.inner.lock().await;
        let now = Instant::now();
        map.retain(|_, entry| now.duration_since(entry.window_start) < self.window);
    }

    pub async fn tracked_clients(&self) -> usize {
        self.inner.lock().await.len()
    }
}

/// Extract client IP: X-Forwarded-For header first, then peer address.
pub fn extract_ip(request: &Request) -> String {
    if let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        // first entry is the original client
        let ip = first.trim();
        if !ip.is_empty() {
            return ip.to_owned();
        }
    }

    request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

/// Rate limit middleware
pub async fn rate_limit(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Response {
    let ip = extract_ip(&request);
    if !state.rate_limiter.check(&ip).await {
        tracing::warn!(ip = %ip, path = %request.uri().path(), "Rate limit exceeded");
        return AppError::rate_limited().into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_within_window() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        assert!(limiter.check("10.0.0.1").await);
        assert!(limiter.check("10.0.0.1").await);
        assert!(!limiter.check("10.0.0.1").await);
        // other clients have their own window
        assert!(limiter.check("10.0.0.2").await);
    }

    #[tokio::test]
    async fn test_counter_saturates_at_max() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));
        limiter.inner.lock().await.insert(
            "10.0.0.9".to_owned(),
            IpEntry {
                count: u32::MAX,
                window_start: Instant::now(),
            },
        );

        assert!(!limiter.check("10.0.0.9").await);
        assert!(!limiter.check("10.0.0.9").await);
        assert_eq!(limiter.inner.lock().await["10.0.0.9"].count, u32::MAX);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_resets_and_cleanup() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check("10.0.0.1").await);
        assert!(!limiter.check("10.0.0.1").await);

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(limiter.check("10.0.0.1").await);

        tokio::time::advance(Duration::from_secs(61)).await;
        limiter.cleanup().await;
        assert_eq!(limiter.tracked_clients().await, 0);
    }

    #[test]
    fn test_extract_ip_prefers_forwarded_header() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(extract_ip(&request), "203.0.113.7");

        let request = Request::builder()
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(extract_ip(&request), "unknown");
    }
}
