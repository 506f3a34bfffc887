//! Polling client for the Flightdeck telemetry bridge.
//!
//! The client polls a snapshot endpoint on a fixed cadence and turns the
//! stream of outcomes into events a dashboard can react to:
//!
//! ```text
//! SnapshotSource --> HeartbeatClient --> Liveness --> HeartbeatListener
//!                                                        |
//!                                                  ChangeDetector --> EventBus callbacks
//! ```
//!
//! [`HeartbeatClient`] keeps exactly one request outstanding and drives
//! two liveness machines: the connection (did the last request succeed)
//! and the service (has any request succeeded within the service
//! timeout). [`ChangeDetector`] compares each new [`Snapshot`] with the
//! previous one and raises named events on the [`EventBus`] only for
//! fields that changed.

pub mod config;
pub mod detector;
pub mod error;
pub mod events;
pub mod heartbeat;
pub mod liveness;
pub mod snapshot;

pub use config::HeartbeatConfig;
pub use detector::ChangeDetector;
pub use error::ClientError;
pub use events::{EventBus, EventKind, EventPayload};
pub use heartbeat::{HeartbeatClient, HeartbeatHandle, HeartbeatListener, HttpSource, SnapshotSource};
pub use liveness::{Liveness, LinkStatus, Transition};
pub use snapshot::Snapshot;
