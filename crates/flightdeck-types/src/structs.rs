//! Structs describing one consistent copy of the observable game state.
//!
//! These mirror what the simulation host can read at a single instant.
//! References between entities (a vessel's parent body, an orbit's
//! encounter body, a body's reference body) are stored as [`BodyIndex`]
//! values and resolved against [`FlightState::bodies`], which keeps the
//! graph acyclic in memory even though it is cyclic in the simulation.

use serde::{Deserialize, Serialize};

use crate::enums::{GameMode, Scene, VesselType};
use crate::ids::{BodyIndex, VesselId};

/// A three-component vector in simulation space.
///
/// Serialized as a `[x, y, z]` array so fixtures stay compact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vector3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vector3 {
    /// Construct a vector from its components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Vector3> for [f64; 3] {
    fn from(v: Vector3) -> Self {
        [v.x, v.y, v.z]
    }
}

/// A crew member aboard a vessel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrewMember {
    /// Full name; unique across the roster.
    pub name: String,
    /// Courage trait in `[0, 1]`.
    pub courage: f64,
    /// Stupidity trait in `[0, 1]`.
    pub stupidity: f64,
    /// Whether this crew member is flagged as notable.
    pub is_badass: bool,
}

/// Keplerian description of a vessel's current orbit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Orbit {
    /// Apoapsis altitude above the surface, metres.
    pub apoapsis_altitude: f64,
    /// Apoapsis distance from the body centre, metres.
    pub apoapsis_radius: f64,
    /// Periapsis altitude above the surface, metres.
    pub periapsis_altitude: f64,
    /// Periapsis distance from the body centre, metres.
    pub periapsis_radius: f64,
    /// Semi-major axis, metres.
    pub semi_major_axis: f64,
    /// Semi-minor axis, metres.
    pub semi_minor_axis: f64,
    /// Semi-latus rectum, metres.
    pub semi_latus_rectum: f64,
    /// Current altitude along the orbit, metres.
    pub altitude: f64,
    /// Eccentricity.
    pub eccentricity: f64,
    /// Eccentric anomaly, radians.
    pub eccentric_anomaly: f64,
    /// Eccentricity vector.
    pub eccentricity_vector: Vector3,
    /// Inclination, degrees.
    pub inclination: f64,
    /// Argument of periapsis, degrees.
    pub argument_of_periapsis: f64,
    /// Longitude of the ascending node, degrees.
    pub longitude_of_ascending_node: f64,
    /// Orbital period, seconds.
    pub period: f64,
    /// Epoch of the orbital elements, seconds of universal time.
    pub epoch: f64,
    /// Closest approach distance to the encounter target, metres.
    pub closest_approach: f64,
    /// Time of closest approach, seconds of universal time.
    pub closest_approach_time: f64,
    /// Body the vessel will next encounter, if any.
    pub closest_encounter_body: Option<BodyIndex>,
}

/// A planet, moon or star.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CelestialBody {
    /// Position in the global body table.
    pub index: BodyIndex,
    /// Body name.
    pub name: String,
    /// Mean radius, metres.
    pub radius: f64,
    /// Standard gravitational parameter, m^3/s^2.
    pub gravitational_parameter: f64,
    /// Sphere of influence radius, metres.
    pub sphere_of_influence: f64,
    /// Sidereal rotation period, seconds.
    pub rotation_period: f64,
    /// Whether the body has an atmosphere.
    pub has_atmosphere: bool,
    /// Height of the atmosphere, metres.
    pub atmosphere_depth: f64,
    /// Body this one orbits; `None` for the root star.
    pub reference_body: Option<BodyIndex>,
}

/// A vessel tracked by the simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vessel {
    /// Stable identifier.
    pub id: VesselId,
    /// Vessel name.
    pub name: String,
    /// Classification.
    pub vessel_type: VesselType,
    /// Whether the vessel can currently be controlled.
    pub is_commandable: bool,
    /// Whether this vessel is a crew member on EVA.
    pub is_eva: bool,
    /// Seconds since launch.
    pub mission_time: f64,
    /// Name of the landing site, empty when not landed somewhere named.
    pub landed_at: String,
    /// Whether the vessel is on the ground.
    pub landed: bool,
    /// Total crew seats.
    pub crew_capacity: u32,
    /// Crew currently aboard.
    pub crew: Vec<CrewMember>,
    /// Current staging index.
    pub current_stage: i32,
    /// Centre of mass in world space.
    pub center_of_mass: Vector3,
    /// Latitude, degrees.
    pub latitude: f64,
    /// Longitude, degrees.
    pub longitude: f64,
    /// Altitude above sea level, metres.
    pub altitude: f64,
    /// Height above the surface below, metres.
    pub height_from_surface: f64,
    /// Height above the terrain below, metres.
    pub height_from_terrain: f64,
    /// Terrain altitude below the vessel, metres.
    pub terrain_altitude: f64,
    /// Terrain surface normal below the vessel.
    pub terrain_normal: Vector3,
    /// Vertical speed, m/s.
    pub vertical_speed: f64,
    /// Surface-relative speed, m/s.
    pub surface_speed: f64,
    /// Horizontal surface-relative speed, m/s.
    pub horizontal_surface_speed: f64,
    /// Orbital velocity.
    pub orbit_velocity: Vector3,
    /// Surface-relative velocity.
    pub surface_velocity: Vector3,
    /// Acceleration.
    pub acceleration: Vector3,
    /// Specific acceleration.
    pub specific_acceleration: f64,
    /// Felt acceleration in g.
    pub gee_force: f64,
    /// Local up axis.
    pub up_axis: Vector3,
    /// Angular velocity.
    pub angular_velocity: Vector3,
    /// Static pressure, kPa.
    pub static_pressure: f64,
    /// Atmospheric density, kg/m^3.
    pub atmospheric_density: f64,
    /// External temperature, kelvin.
    pub external_temperature: f64,
    /// Current orbit.
    pub orbit: Orbit,
    /// Body whose sphere of influence the vessel is in.
    pub main_body: BodyIndex,
}

/// Metadata about the game currently loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunInfo {
    /// Save title.
    pub title: String,
    /// Rule set.
    pub mode: GameMode,
    /// Simulated clock, seconds of universal time.
    pub universal_time: f64,
    /// Available funds (career only).
    pub funds: Option<f64>,
    /// Banked science points.
    pub science: Option<f64>,
    /// Reputation (career only).
    pub reputation: Option<f64>,
}

/// Everything observable while in flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightState {
    /// Whether the flight scene has finished initialising.
    pub ready: bool,
    /// Whether time warp is engaged.
    pub warp_drive_active: bool,
    /// Temperature of vacuum, kelvin.
    pub vacuum_temperature: f64,
    /// The vessel under player control, if any.
    pub active_vessel: Option<VesselId>,
    /// Every tracked vessel, including the active one.
    pub vessels: Vec<Vessel>,
    /// The global body table.
    pub bodies: Vec<CelestialBody>,
}

impl FlightState {
    /// The vessel under player control, if it is tracked.
    pub fn active_vessel(&self) -> Option<&Vessel> {
        let id = self.active_vessel?;
        self.vessels.iter().find(|v| v.id == id)
    }

    /// Every tracked vessel except the active one.
    pub fn other_vessels(&self) -> impl Iterator<Item = &Vessel> {
        let active = self.active_vessel;
        self.vessels.iter().filter(move |v| Some(v.id) != active)
    }

    /// Resolve a body reference.
    pub fn body(&self, index: BodyIndex) -> Option<&CelestialBody> {
        self.bodies.iter().find(|b| b.index == index)
    }
}

/// One consistent copy of the observable game state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    /// The simulation's internal code for the loaded scene.
    pub scene_code: i32,
    /// The current game, absent in menus.
    pub run: Option<RunInfo>,
    /// Flight data, present while the flight scene is loaded.
    pub flight: Option<FlightState>,
}

impl GameState {
    /// The loaded scene, mapped through the scene table.
    pub fn scene(&self) -> Scene {
        Scene::from_code(self.scene_code)
    }

    /// Whether the flight scene is loaded and flight data is present.
    pub fn in_flight(&self) -> Option<&FlightState> {
        if self.scene().is_flight() {
            self.flight.as_ref()
        } else {
            None
        }
    }
}
