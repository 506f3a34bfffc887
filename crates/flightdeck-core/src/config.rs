//! Configuration loading and typed config structures for the Flightdeck server.
//!
//! The configuration lives in `flightdeck-config.yaml`. This module defines
//! strongly-typed structs that mirror the YAML structure, and provides a
//! loader that reads the file and applies environment overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for environment variable {name}")]
    Env {
        /// Variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A parsed value is out of range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level server configuration.
///
/// Mirrors the structure of `flightdeck-config.yaml`. Every section and
/// field is optional and falls back to its default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FlightdeckConfig {
    /// Listener and HTTP surface.
    #[serde(default)]
    pub server: ServerSection,

    /// Caller address filtering.
    #[serde(default)]
    pub access: AccessSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSection,

    /// Where the served game state comes from.
    #[serde(default)]
    pub state: StateSection,
}

impl FlightdeckConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `FLIGHTDECK_HOST` overrides `server.host`
    /// - `FLIGHTDECK_PORT` overrides `server.port`
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string and apply overrides.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.server.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.server.api_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                field: "server.api_path",
                reason: "must start with '/'",
            });
        }
        if self.server.api_path == "/" {
            return Err(ConfigError::Invalid {
                field: "server.api_path",
                reason: "must not be the index path",
            });
        }
        if self.server.index_document.is_empty() {
            return Err(ConfigError::Invalid {
                field: "server.index_document",
                reason: "must not be empty",
            });
        }
        Ok(())
    }
}

/// Listener and HTTP surface configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path that serves the snapshot.
    #[serde(default = "default_api_path")]
    pub api_path: String,

    /// Directory static resources are served from.
    #[serde(default = "default_resource_dir")]
    pub resource_dir: PathBuf,

    /// Document served for `/`.
    #[serde(default = "default_index_document")]
    pub index_document: String,
}

impl ServerSection {
    /// Apply environment variable overrides for the listener address.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("FLIGHTDECK_HOST") {
            self.host = val;
        }
        if let Ok(val) = std::env::var("FLIGHTDECK_PORT") {
            match val.parse() {
                Ok(port) => self.port = port,
                Err(_) => {
                    return Err(ConfigError::Env {
                        name: "FLIGHTDECK_PORT",
                        value: val,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_path: default_api_path(),
            resource_dir: default_resource_dir(),
            index_document: default_index_document(),
        }
    }
}

/// Caller address filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct AccessSection {
    /// Serve callers outside the private and loopback ranges.
    #[serde(default)]
    pub allow_public: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingSection {
    /// Log level used when `RUST_LOG` is unset (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Where the served game state comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StateSection {
    /// YAML fixture loaded at startup; an empty state when unset.
    #[serde(default)]
    pub fixture: Option<PathBuf>,

    /// Advance the simulated clock once per second.
    #[serde(default)]
    pub advance_clock: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    7001
}

fn default_api_path() -> String {
    "/api/snapshot".to_owned()
}

fn default_resource_dir() -> PathBuf {
    PathBuf::from("web")
}

fn default_index_document() -> String {
    "index.html".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}
