//! Error types for the Observer HTTP server.
//!
//! [`ObserverError`] unifies all failure modes into a single enum that
//! can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.
//! Access and lookup failures become ordinary `403`/`404` pages; every
//! other failure is logged and answered with an empty `500`.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use flightdeck_core::EncodeError;
use tracing::error;

/// Errors that can occur in the Observer layer.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// The caller's address is outside the allowed ranges.
    #[error("forbidden")]
    Forbidden,

    /// The requested path does not name a servable resource.
    #[error("not found: {0}")]
    NotFound(String),

    /// The snapshot builder was misused.
    #[error("snapshot encoding failed: {0}")]
    Encode(#[from] EncodeError),

    /// Reading a resource failed after it was found.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        match self {
            Self::Forbidden => (StatusCode::FORBIDDEN, Html("Forbidden")).into_response(),
            Self::NotFound(path) => (
                StatusCode::NOT_FOUND,
                Html(format!(
                    "The given path, {}, could not be found",
                    escape_html(&path)
                )),
            )
                .into_response(),
            Self::Encode(_) | Self::Io(_) | Self::Internal(_) => {
                error!(error = %self, "request handler failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}
