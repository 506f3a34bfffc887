//! Error types for the polling client.
//!
//! Poll failures never reach the host: the heartbeat loop classifies them
//! as failed attempts and only logs them. The variants still carry enough
//! detail for that log line to be useful.

use std::time::Duration;

/// Errors that can occur in the polling client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(String),

    /// The request could not be sent or the connection failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("server returned status {0}")]
    Status(u16),

    /// The response body was not a JSON object.
    #[error("malformed snapshot: {0}")]
    Malformed(String),

    /// No response arrived within the request timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// An event selector named no known event.
    #[error("unknown event: {0}")]
    UnknownEvent(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}
