//! Observer HTTP server for the Flightdeck telemetry bridge.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Snapshot endpoint** (`/api/snapshot` by default) returning the full
//!   game-state snapshot as JSON, built on a blocking worker per request
//! - **Static dashboard files** served from a resource directory, with
//!   `/` mapped to the index document
//!
//! # Architecture
//!
//! Every request first passes the access filter in [`access`], which
//! answers `403` for callers outside the private and loopback ranges.
//! The snapshot handler asks the host's [`StateProvider`] for a consistent
//! copy and runs the snapshot builder off the async executor. Static files
//! are streamed in fixed-size chunks. A panicking handler is caught at the
//! connection boundary and answered with an empty `500`.
//!
//! [`StateProvider`]: flightdeck_types::StateProvider

pub mod access;
pub mod error;
pub mod files;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, serve, start_server};
pub use startup::{RunningObserver, StartupError, spawn_observer};
pub use state::{AppState, SiteConfig};
