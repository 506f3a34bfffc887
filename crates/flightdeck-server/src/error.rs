//! Error types for the server binary.

use std::path::PathBuf;

/// Top-level error for the server binary.
///
/// Each variant wraps a startup failure so `main` can propagate it
/// with `?`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: flightdeck_core::ConfigError,
    },

    /// `FLIGHTDECK_CONFIG` names a file that does not exist.
    #[error("config file {} named by FLIGHTDECK_CONFIG does not exist", path.display())]
    ConfigMissing {
        /// The configured path.
        path: PathBuf,
    },

    /// The state fixture could not be read or parsed.
    #[error("fixture error in {}: {message}", path.display())]
    Fixture {
        /// The fixture file.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// The Observer API server failed to start.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying startup error.
        #[from]
        source: flightdeck_observer::StartupError,
    },
}
