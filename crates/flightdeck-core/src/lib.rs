//! Core serialization for the Flightdeck telemetry bridge.
//!
//! Turns a [`GameState`] copy into the JSON text served to observers.
//!
//! # Modules
//!
//! - [`json`] -- Immediate-mode, single-use JSON object builder
//! - [`snapshot`] -- Walks the game state and emits it at the right fidelity
//! - [`config`] -- YAML configuration for the server binary
//!
//! [`GameState`]: flightdeck_types::GameState

pub mod config;
pub mod json;
pub mod snapshot;

pub use config::{ConfigError, FlightdeckConfig};
pub use json::{EncodeError, JsonBuilder, JsonValue};
pub use snapshot::{Fidelity, build_snapshot, capture_snapshot};
