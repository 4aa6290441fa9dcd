//! API route definitions.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::handlers;
use super::state::AppState;

pub const VALIDATE_USERNAME_PATH: &str = "/api/identity/user/v1.0/validate-username";

pub fn create_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(handlers::health))
        .route(VALIDATE_USERNAME_PATH, post(handlers::validate_username))
        .route(
            "/t/{tenant}/api/identity/user/v1.0/validate-username",
            post(handlers::validate_username_for_tenant),
        )
        .layer(trace_layer)
        .with_state(state)
}
