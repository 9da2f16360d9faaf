//! Premium Food Ventures site library.
//!
//! The public marketing site and the admin back-office in one router,
//! backed by a hosted database, object storage, and auth provider. The
//! binary in `main.rs` adds Sentry and serves [`app`]; tests drive the same
//! router against an in-memory backend.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod actions;
pub mod backend;
pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod filters;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod reconcile;
pub mod routes;
pub mod screens;
pub mod state;

use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use premium_food_core::Product;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::backend::{Caller, Repository};
use crate::state::AppState;

/// Static assets, relative to the workspace root.
const STATIC_DIR: &str = "crates/site/static";

/// Build the full application router.
///
/// Layers, outermost first: request tracing, security headers, session,
/// auth gate.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_gate,
        ))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Counts products as the anonymous visitor would. Returns 503 Service
/// Unavailable if the backend is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match Repository::<Product>::new(state.database(), &Caller::Anonymous)
        .count()
        .await
    {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!("Readiness check failed: {e}");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
