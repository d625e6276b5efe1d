//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the HTTP endpoints the tactics board talks to: the
//! current-user lookup and the per-owner snapshot store.

pub mod auth;
pub mod snapshots;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, patch};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// API routes with CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/auth/me", get(auth::me))
        .route(
            "/api/tactical-boards",
            get(snapshots::list_snapshots).post(snapshots::create_snapshot),
        )
        .route("/api/tactical-boards/{id}", patch(snapshots::update_snapshot))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
