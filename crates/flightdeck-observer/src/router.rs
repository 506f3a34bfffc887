//! Axum router construction for the Observer server.
//!
//! Assembles the snapshot endpoint and static resource routes into a
//! single [`Router`] behind the access filter, with CORS enabled for
//! dashboards served from other origins.

use std::any::Any;
use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::access;
use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /` -- the index document
/// - `GET {api_path}` -- the full snapshot
/// - `GET /{name}` -- a static resource
///
/// Every other path is `404`. The access filter runs before routing, so
/// a blocked caller gets `403` whatever the path.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    Router::new()
        .route(&state.site.api_path, get(handlers::snapshot))
        .route("/", get(handlers::index))
        .route("/{name}", get(handlers::resource))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            access::require_private,
        ))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Log a handler panic and answer with an empty `500`.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| String::from("non-string panic payload"));
    error!(panic = %message, "request handler panicked");
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}
