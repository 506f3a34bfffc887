//! Flightdeck server binary.
//!
//! Serves game-state snapshots and the dashboard files over HTTP. The
//! served state comes from an optional YAML fixture, optionally advanced
//! by a simulated clock, until a host simulation is attached through
//! [`flightdeck_types::StateProvider`].
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `flightdeck-config.yaml` (or `FLIGHTDECK_CONFIG`,
//!    which must name an existing file)
//! 2. Initialize structured logging (tracing)
//! 3. Load the state fixture, if configured
//! 4. Start the simulated clock, if enabled
//! 5. Start the Observer API server
//! 6. Run until `Ctrl-C`, then shut down

mod error;
mod state;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use flightdeck_core::FlightdeckConfig;
use flightdeck_observer::{AppState, ServerConfig, SiteConfig, spawn_observer};
use flightdeck_types::{GameState, SharedState};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Config file used when `FLIGHTDECK_CONFIG` is not set.
const DEFAULT_CONFIG_PATH: &str = "flightdeck-config.yaml";

/// Application entry point for the Flightdeck server.
///
/// # Errors
///
/// Returns an error if configuration, fixture loading, or server startup
/// fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet; the outcome is
    //    reported once it is.
    let location = ConfigLocation::from_env(std::env::var_os("FLIGHTDECK_CONFIG"));
    let (config, config_found) = load_config(&location)?;
    let config_path = location.path();

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"))
        }))
        .with_target(true)
        .init();

    info!("flightdeck-server starting");
    if config_found {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        host = config.server.host,
        port = config.server.port,
        api_path = config.server.api_path,
        resource_dir = %config.server.resource_dir.display(),
        allow_public = config.access.allow_public,
        "Server configuration"
    );

    // 3. Load the served state.
    let initial = match &config.state.fixture {
        Some(path) => {
            let loaded = state::load_fixture(path)?;
            info!(
                path = %path.display(),
                scene = loaded.scene().as_str(),
                "State fixture loaded"
            );
            loaded
        }
        None => {
            info!("No state fixture configured, serving an empty state");
            GameState::default()
        }
    };
    let shared = SharedState::new(initial);

    // 4. Start the simulated clock.
    let clock = config.state.advance_clock.then(|| {
        info!(tick_ms = state::CLOCK_TICK.as_millis(), "Simulated clock started");
        state::spawn_clock(shared.clone(), state::CLOCK_TICK)
    });

    // 5. Start the Observer API server.
    let app_state = Arc::new(AppState::new(
        Arc::new(shared),
        SiteConfig::from(&config),
    ));
    let observer = spawn_observer(&ServerConfig::from(&config), app_state)
        .await
        .map_err(AppError::from)?;
    info!(addr = %observer.local_addr(), "Observer API server started");

    // 6. Run until interrupted.
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    if let Some(clock) = clock {
        clock.abort();
    }
    observer.stop().await;

    info!("flightdeck-server shutdown complete");
    Ok(())
}

/// Where the configuration file is looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ConfigLocation {
    /// Named by `FLIGHTDECK_CONFIG`; the file must exist.
    Explicit(PathBuf),
    /// [`DEFAULT_CONFIG_PATH`]; defaults apply when it is absent.
    Default(PathBuf),
}

impl ConfigLocation {
    /// Resolve from the value of `FLIGHTDECK_CONFIG`, if set.
    fn from_env(value: Option<OsString>) -> Self {
        value.map_or_else(
            || Self::Default(PathBuf::from(DEFAULT_CONFIG_PATH)),
            |path| Self::Explicit(PathBuf::from(path)),
        )
    }

    fn path(&self) -> &Path {
        match self {
            Self::Explicit(path) | Self::Default(path) => path,
        }
    }
}

/// Load the configuration and report whether a file was read.
///
/// A missing default file falls back to defaults; a missing explicit file
/// is an error. Environment overrides apply in every case.
fn load_config(location: &ConfigLocation) -> Result<(FlightdeckConfig, bool), AppError> {
    let path = location.path();
    if path.exists() {
        return Ok((FlightdeckConfig::from_file(path)?, true));
    }
    if let ConfigLocation::Explicit(path) = location {
        return Err(AppError::ConfigMissing { path: path.clone() });
    }
    let mut config = FlightdeckConfig::default();
    config.server.apply_env_overrides()?;
    config.validate()?;
    Ok((config, false))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unset_variable_uses_the_default_path() {
        assert_eq!(
            ConfigLocation::from_env(None),
            ConfigLocation::Default(PathBuf::from(DEFAULT_CONFIG_PATH))
        );
        assert_eq!(
            ConfigLocation::from_env(Some(OsString::from("/etc/fd.yaml"))),
            ConfigLocation::Explicit(PathBuf::from("/etc/fd.yaml"))
        );
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typo.yaml");
        let err = load_config(&ConfigLocation::Explicit(path.clone())).unwrap_err();
        assert!(matches!(err, AppError::ConfigMissing { path: p } if p == path));
    }

    #[test]
    fn missing_default_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let location = ConfigLocation::Default(dir.path().join(DEFAULT_CONFIG_PATH));
        let (config, found) = load_config(&location).unwrap();
        assert!(!found);
        assert_eq!(config.server.api_path, FlightdeckConfig::default().server.api_path);
    }

    #[test]
    fn existing_config_is_read_from_either_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flightdeck.yaml");
        std::fs::write(&path, "logging:\n  level: debug\n").unwrap();

        for location in [
            ConfigLocation::Explicit(path.clone()),
            ConfigLocation::Default(path),
        ] {
            let (config, found) = load_config(&location).unwrap();
            assert!(found);
            assert_eq!(config.logging.level, "debug");
        }
    }
}
