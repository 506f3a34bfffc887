//! Static resource serving.
//!
//! Resource names are a single path segment made of word characters,
//! hyphens and dots. Names outside that alphabet are rejected before the
//! filesystem is touched, so no name can climb out of the resource
//! directory. Files are streamed in [`CHUNK_SIZE`] pieces.

use std::path::Path;

use axum::body::{Body, Bytes};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::error::ObserverError;

/// Bytes read from disk per streamed body chunk.
pub const CHUNK_SIZE: usize = 256 * 1024;

/// MIME type used when the extension is not in the table.
pub const DEFAULT_MIME: &str = "text/html";

const MIME_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("txt", "text/plain"),
];

/// Whether `name` is an acceptable resource name.
pub fn is_resource_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
}

/// MIME type for `path`, chosen by its lower-cased extension.
pub fn mime_for(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return DEFAULT_MIME;
    };
    let ext = ext.to_ascii_lowercase();
    MIME_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map_or(DEFAULT_MIME, |(_, mime)| *mime)
}

/// Stream the resource `name` from `dir`.
///
/// `request_path` is only used in the not-found page.
pub async fn serve_file(
    dir: &Path,
    name: &str,
    request_path: &str,
) -> Result<Response, ObserverError> {
    if !is_resource_name(name) {
        debug!(name, "rejected resource name");
        return Err(ObserverError::NotFound(request_path.to_owned()));
    }

    let path = dir.join(name);
    let Ok(file) = File::open(&path).await else {
        debug!(path = %path.display(), "resource not found");
        return Err(ObserverError::NotFound(request_path.to_owned()));
    };
    let metadata = file.metadata().await?;
    if !metadata.is_file() {
        debug!(path = %path.display(), "resource is not a regular file");
        return Err(ObserverError::NotFound(request_path.to_owned()));
    }

    let body = Body::from_stream(chunks(file));
    Ok((
        [
            (header::CONTENT_TYPE, mime_for(&path).to_owned()),
            (header::CONTENT_LENGTH, metadata.len().to_string()),
        ],
        body,
    )
        .into_response())
}

/// Read `file` to its end as a stream of chunks.
fn chunks(file: File) -> impl futures::Stream<Item = std::io::Result<Bytes>> + Send + 'static {
    futures::stream::try_unfold(file, |mut file| async move {
        let mut buf = vec![0_u8; CHUNK_SIZE];
        let read = file.read(&mut buf).await?;
        if read == 0 {
            return Ok(None);
        }
        buf.truncate(read);
        Ok(Some((Bytes::from(buf), file)))
    })
}
