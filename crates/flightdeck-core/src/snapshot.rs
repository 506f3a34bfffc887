//! Snapshot builder.
//!
//! Walks one [`GameState`] copy and writes it through a [`JsonBuilder`].
//! Vessels and bodies are emitted at a [`Fidelity`] chosen by where they
//! appear: the active vessel and the body table at [`Fidelity::Full`],
//! every other vessel at [`Fidelity::Partial`], and every back-reference
//! (a vessel's parent body, an orbit's encounter body, a body's reference
//! body) at [`Fidelity::Index`]. Index references never expand further,
//! so the cyclic body graph serializes in bounded depth.

use std::collections::HashSet;

use flightdeck_types::{
    BodyIndex, CelestialBody, FlightState, GameState, Orbit, RunInfo, StateProvider, Vessel,
};
use tracing::debug;

use crate::json::{EncodeError, JsonBuilder};

/// How much of an entity is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fidelity {
    /// Every known field.
    Full,
    /// Identity, classification and position.
    Partial,
    /// Name and index (or id) only.
    Index,
}

/// Build the snapshot text for one state copy.
pub fn build_snapshot(state: &GameState) -> Result<String, EncodeError> {
    let mut json = JsonBuilder::new();
    let scene = state.scene();

    json.add_value("currentScene", scene.as_str())?;
    json.add_value("isEditor", scene.is_editor())?;
    json.add_value("isFlight", scene.is_flight())?;

    if let Some(run) = &state.run {
        write_run(&mut json, run)?;
        json.add_value("universalTime", run.universal_time)?;
    }

    if let Some(flight) = state.in_flight() {
        json.object("flightGlobals", |json| write_flight(json, flight))?;
    }

    json.finish()
}

/// Capture a consistent copy from `provider` and build its snapshot.
///
/// Blocks while the provider takes its copy; call from a blocking worker.
pub fn capture_snapshot<P>(provider: &P) -> Result<String, EncodeError>
where
    P: StateProvider + ?Sized,
{
    let state = provider.capture();
    build_snapshot(&state)
}

fn write_run(json: &mut JsonBuilder, run: &RunInfo) -> Result<(), EncodeError> {
    json.object("game", |json| {
        json.add_value("title", &run.title)?;
        json.add_value("mode", run.mode.as_str())?;
        if let Some(funds) = run.funds {
            json.add_value("funds", funds)?;
        }
        if let Some(science) = run.science {
            json.add_value("science", science)?;
        }
        if let Some(reputation) = run.reputation {
            json.add_value("reputation", reputation)?;
        }
        Ok(())
    })
}

fn write_flight(json: &mut JsonBuilder, flight: &FlightState) -> Result<(), EncodeError> {
    json.add_value("ready", flight.ready)?;
    json.add_value("warpDriveActive", flight.warp_drive_active)?;
    json.add_value("vacuumTemperature", flight.vacuum_temperature)?;

    if let Some(active) = flight.active_vessel() {
        write_vessel(json, "activeVessel", active, Fidelity::Full, flight)?;
    } else if let Some(id) = flight.active_vessel {
        debug!(vessel = %id, "active vessel is not tracked; omitted");
    }

    json.object("vessels", |json| {
        let mut keys = UniqueKeys::default();
        for vessel in flight.other_vessels() {
            let key = keys.claim(&vessel.id.to_string());
            write_vessel(json, &key, vessel, Fidelity::Partial, flight)?;
        }
        Ok(())
    })?;

    json.object("bodies", |json| {
        let mut keys = UniqueKeys::default();
        for body in &flight.bodies {
            let key = keys.claim(&body.index.to_string());
            write_body(json, &key, body, Fidelity::Full, flight)?;
        }
        Ok(())
    })
}

/// Keys for one collection object, unique whatever the provider hands over.
///
/// A repeated base key gets a ` (2)`, ` (3)`, ... suffix.
#[derive(Debug, Default)]
struct UniqueKeys(HashSet<String>);

impl UniqueKeys {
    fn claim(&mut self, base: &str) -> String {
        if self.0.insert(base.to_owned()) {
            return base.to_owned();
        }
        let mut n: u32 = 2;
        loop {
            let candidate = format!("{base} ({n})");
            if self.0.insert(candidate.clone()) {
                debug!(key = base, renamed = %candidate, "repeated collection key");
                return candidate;
            }
            n = n.saturating_add(1);
        }
    }
}

fn write_vessel(
    json: &mut JsonBuilder,
    key: &str,
    vessel: &Vessel,
    fidelity: Fidelity,
    flight: &FlightState,
) -> Result<(), EncodeError> {
    json.object(key, |json| {
        json.add_value("id", vessel.id.to_string().as_str())?;
        json.add_value("name", &vessel.name)?;
        if fidelity == Fidelity::Index {
            return Ok(());
        }

        json.add_value("type", vessel.vessel_type.as_str())?;
        if fidelity == Fidelity::Full {
            json.add_value("isCommandable", vessel.is_commandable)?;
            json.add_value("isEVA", vessel.is_eva)?;
            json.add_value("missionTime", vessel.mission_time)?;
            json.add_value("landedAt", &vessel.landed_at)?;
            json.add_value("landed", vessel.landed)?;
            write_crew(json, vessel)?;
            json.add_value("currentStage", vessel.current_stage)?;
            json.add_value("centerOfMass", vessel.center_of_mass)?;
        }

        json.add_value("latitude", vessel.latitude)?;
        json.add_value("longitude", vessel.longitude)?;
        json.add_value("altitude", vessel.altitude)?;

        if fidelity == Fidelity::Full {
            json.add_value("heightFromSurface", vessel.height_from_surface)?;
            json.add_value("heightFromTerrain", vessel.height_from_terrain)?;
            json.add_value("terrainAltitude", vessel.terrain_altitude)?;
            json.add_value("terrainNormal", vessel.terrain_normal)?;
            json.add_value("verticalSpeed", vessel.vertical_speed)?;
            json.add_value("surfaceSpeed", vessel.surface_speed)?;
            json.add_value("horizontalSurfaceSpeed", vessel.horizontal_surface_speed)?;
            json.add_value("orbitVelocity", vessel.orbit_velocity)?;
            json.add_value("surfaceVelocity", vessel.surface_velocity)?;
            json.add_value("acceleration", vessel.acceleration)?;
            json.add_value("specificAcceleration", vessel.specific_acceleration)?;
            json.add_value("geeForce", vessel.gee_force)?;
            json.add_value("upAxis", vessel.up_axis)?;
            json.add_value("angularVelocity", vessel.angular_velocity)?;
            json.add_value("staticPressure", vessel.static_pressure)?;
            json.add_value("atmosphericDensity", vessel.atmospheric_density)?;
            json.add_value("externalTemperature", vessel.external_temperature)?;
            json.object("orbit", |json| write_orbit(json, &vessel.orbit, flight))?;
        }

        write_body_ref(json, "celestialBody", Some(vessel.main_body), flight)
    })
}

fn write_crew(json: &mut JsonBuilder, vessel: &Vessel) -> Result<(), EncodeError> {
    json.add_value("crewCapacity", vessel.crew_capacity)?;
    json.add_value("crewCount", vessel.crew.len())?;
    json.object("crew", |json| {
        let mut keys = UniqueKeys::default();
        for member in &vessel.crew {
            json.object(&keys.claim(&member.name), |json| {
                json.add_value("name", &member.name)?;
                json.add_value("courage", member.courage)?;
                json.add_value("stupidity", member.stupidity)?;
                json.add_value("isBadass", member.is_badass)
            })?;
        }
        Ok(())
    })
}

fn write_orbit(
    json: &mut JsonBuilder,
    orbit: &Orbit,
    flight: &FlightState,
) -> Result<(), EncodeError> {
    json.add_value("apoapsisAltitude", orbit.apoapsis_altitude)?;
    json.add_value("apoapsisRadius", orbit.apoapsis_radius)?;
    json.add_value("periapsisAltitude", orbit.periapsis_altitude)?;
    json.add_value("periapsisRadius", orbit.periapsis_radius)?;
    json.add_value("semiMajorAxis", orbit.semi_major_axis)?;
    json.add_value("semiMinorAxis", orbit.semi_minor_axis)?;
    json.add_value("semiLatusRectum", orbit.semi_latus_rectum)?;
    json.add_value("altitude", orbit.altitude)?;
    json.add_value("eccentricity", orbit.eccentricity)?;
    json.add_value("eccentricAnomaly", orbit.eccentric_anomaly)?;
    json.add_value("eccentricityVector", orbit.eccentricity_vector)?;
    json.add_value("inclination", orbit.inclination)?;
    json.add_value("argumentOfPeriapsis", orbit.argument_of_periapsis)?;
    json.add_value("longitudeOfAscendingNode", orbit.longitude_of_ascending_node)?;
    json.add_value("period", orbit.period)?;
    json.add_value("epoch", orbit.epoch)?;
    json.add_value("closestApproach", orbit.closest_approach)?;
    json.add_value("closestApproachTime", orbit.closest_approach_time)?;
    write_body_ref(
        json,
        "closestEncounterBody",
        orbit.closest_encounter_body,
        flight,
    )
}

fn write_body(
    json: &mut JsonBuilder,
    key: &str,
    body: &CelestialBody,
    fidelity: Fidelity,
    flight: &FlightState,
) -> Result<(), EncodeError> {
    json.object(key, |json| {
        json.add_value("name", &body.name)?;
        json.add_value("index", body.index.get())?;
        if fidelity == Fidelity::Index {
            return Ok(());
        }

        json.add_value("radius", body.radius)?;
        if fidelity == Fidelity::Full {
            json.add_value("gravitationalParameter", body.gravitational_parameter)?;
            json.add_value("sphereOfInfluence", body.sphere_of_influence)?;
            json.add_value("rotationPeriod", body.rotation_period)?;
            json.add_value("hasAtmosphere", body.has_atmosphere)?;
            if body.has_atmosphere {
                json.add_value("atmosphereDepth", body.atmosphere_depth)?;
            }
        }
        write_body_ref(json, "referenceBody", body.reference_body, flight)
    })
}

/// Write an index-fidelity body reference; unresolved references are omitted.
fn write_body_ref(
    json: &mut JsonBuilder,
    key: &str,
    index: Option<BodyIndex>,
    flight: &FlightState,
) -> Result<(), EncodeError> {
    let Some(index) = index else {
        return Ok(());
    };
    match flight.body(index) {
        Some(body) => write_body(json, key, body, Fidelity::Index, flight),
        None => {
            debug!(body = %index, key, "body reference does not resolve; omitted");
            Ok(())
        }
    }
}
