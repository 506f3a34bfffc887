//! HTTP endpoint handlers for the Observer server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | The index document |
//! | `GET` | API path | Full snapshot as `application/json` |
//! | `GET` | `/{name}` | Static resource, or `404` |
//!
//! Query strings are accepted on every endpoint and ignored.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{Uri, header};
use axum::response::{IntoResponse, Response};
use flightdeck_core::capture_snapshot;
use tracing::debug;

use crate::error::ObserverError;
use crate::files::serve_file;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Build and return the full snapshot.
///
/// Capturing state may block on the host's lock, so the build runs on a
/// blocking worker.
pub async fn snapshot(State(state): State<Arc<AppState>>) -> Result<Response, ObserverError> {
    let provider = Arc::clone(&state.provider);
    let text = tokio::task::spawn_blocking(move || capture_snapshot(provider.as_ref()))
        .await
        .map_err(|e| ObserverError::Internal(format!("snapshot worker failed: {e}")))??;

    debug!(bytes = text.len(), "snapshot built");
    Ok(([(header::CONTENT_TYPE, "application/json")], text).into_response())
}

// ---------------------------------------------------------------------------
// Static files
// ---------------------------------------------------------------------------

/// Serve the index document for `/`.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Response, ObserverError> {
    serve_file(&state.site.resource_dir, &state.site.index_document, "/").await
}

/// Serve a single-segment static resource.
pub async fn resource(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    uri: Uri,
) -> Result<Response, ObserverError> {
    serve_file(&state.site.resource_dir, &name, uri.path()).await
}

/// Answer every unmatched path with `404`.
pub async fn not_found(uri: Uri) -> ObserverError {
    ObserverError::NotFound(uri.path().to_owned())
}
