//! State-provider model types for the Flightdeck telemetry bridge.
//!
//! The simulation host owns the live game state. It hands Flightdeck a
//! consistent copy of that state through the [`StateProvider`] trait, and
//! the snapshot builder in `flightdeck-core` serializes it for observers.
//! This crate only describes the shape of that copy; it does not read any
//! engine internals.
//!
//! # Modules
//!
//! - [`ids`] -- Identifier newtypes for vessels and celestial bodies
//! - [`enums`] -- Scenes, vessel classifications and game modes
//! - [`structs`] -- Vessels, orbits, bodies, crew and the top-level state
//! - [`provider`] -- The [`StateProvider`] seam and the shared default

pub mod enums;
pub mod ids;
pub mod provider;
pub mod structs;

pub use enums::{GameMode, Scene, UnknownScene, VesselType};
pub use ids::{BodyIndex, VesselId};
pub use provider::{SharedState, StateProvider};
pub use structs::{
    CelestialBody, CrewMember, FlightState, GameState, Orbit, RunInfo, Vector3, Vessel,
};
