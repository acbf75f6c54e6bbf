//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                  - Welcome banner
//! GET  /health            - Liveness check
//!
//! # Users
//! POST /users/create      - Register a user (JSON body)
//! GET  /users/id/{id}     - Look up by id
//! GET  /users/{email}     - Look up by email (case-insensitive)
//! ```
//!
//! The binary adds `GET /health/ready`, which needs a live database pool.

pub mod users;

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{cors_layer, request_id_middleware};
use crate::state::AppState;

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(users::create))
        .route("/id/{id}", get(users::show_by_id))
        .route("/{email}", get(users::show_by_email))
}

/// Create all routes, without middleware or state.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .nest("/users", user_routes())
}

/// Build the full application: routes, middleware stack and state.
pub fn router(state: AppState) -> Router {
    routes()
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                        request_id = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .layer(cors_layer())
        .with_state(state)
}

async fn home() -> &'static str {
    "Welcome to the user registry API"
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
