//! Shared application state for the Observer HTTP server.
//!
//! [`AppState`] holds the host's state provider and the site settings
//! (API path, resource directory, access switch). Handlers share no
//! mutable state; every snapshot request takes its own copy from the
//! provider.

use std::path::PathBuf;
use std::sync::Arc;

use flightdeck_core::FlightdeckConfig;
use flightdeck_types::StateProvider;

/// HTTP surface settings shared by every handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Path that serves the snapshot.
    pub api_path: String,
    /// Directory static resources are served from.
    pub resource_dir: PathBuf,
    /// Document served for `/`.
    pub index_document: String,
    /// Serve callers outside the private and loopback ranges.
    pub allow_public: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::from(&FlightdeckConfig::default())
    }
}

impl From<&FlightdeckConfig> for SiteConfig {
    fn from(config: &FlightdeckConfig) -> Self {
        Self {
            api_path: config.server.api_path.clone(),
            resource_dir: config.server.resource_dir.clone(),
            index_document: config.server.index_document.clone(),
            allow_public: config.access.allow_public,
        }
    }
}

/// Shared state for the Observer server.
///
/// Wrapped in an [`Arc`] and shared across all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Source of consistent game-state copies.
    pub provider: Arc<dyn StateProvider>,
    /// HTTP surface settings.
    pub site: SiteConfig,
}

impl AppState {
    /// Create application state serving `provider` with `site` settings.
    pub fn new(provider: Arc<dyn StateProvider>, site: SiteConfig) -> Self {
        Self { provider, site }
    }
}

impl core::fmt::Debug for AppState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppState")
            .field("site", &self.site)
            .finish_non_exhaustive()
    }
}
