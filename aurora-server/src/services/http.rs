//! HTTP router assembly
//!
//! Resource routers are merged under `/api`, rate limited per client IP,
//! then wrapped in tracing, CORS and body size limits.

use axum::extract::DefaultBodyLimit;
use axum::{Router, middleware};
use http::{HeaderValue, Method, Request, header};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::core::{Config, ServerState};
use crate::utils::rate_limit::rate_limit;
use shared::AppError;

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        .merge(crate::api::tenants::router())
        .merge(crate::api::maintenance::router())
        .merge(crate::api::inventory::router())
}

/// Full application router with middleware and state
pub fn build_router(state: ServerState) -> Router {
    let config = state.config.clone();

    build_app()
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .fallback(route_not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|req: &Request<axum::body::Body>| {
                            let request_id = uuid::Uuid::new_v4();
                            tracing::info_span!(
                                "http_request",
                                %request_id,
                                method = %req.method(),
                                uri = %req.uri(),
                            )
                        })
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(cors_layer(&config))
                .map_response(|res: http::Response<_>| res.map(axum::body::Body::new))
                .layer(DefaultBodyLimit::max(config.body_limit_bytes))
                .layer(RequestBodyLimitLayer::new(config.body_limit_bytes)),
        )
}

async fn route_not_found() -> AppError {
    AppError::route_not_found()
}

/// CORS for the configured browser origins
///
/// A `*` entry allows any origin, without credentials.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    if config.cors_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}
