//! Integration tests for snapshot building.
//!
//! Loads the shared Kerbin-orbit fixture, builds its snapshot and checks
//! the wire text with a standard JSON parser.

#![allow(clippy::unwrap_used)]

use flightdeck_core::{build_snapshot, capture_snapshot};
use flightdeck_types::{GameState, SharedState};
use serde_json::{Map, Value};

const FIXTURE: &str = include_str!("../../../fixtures/kerbin-orbit.yaml");

const ACTIVE_ID: &str = "6f1c2c7e-3a42-4f5e-9b7d-2d4f1e8a9c01";
const PROBE_ID: &str = "0b8d0f5a-94c3-4b8e-8c47-7f1a3e6d2b10";
const DEBRIS_ID: &str = "a4c9e2d1-7b1e-4d5c-8f22-1c0b9d7e6a55";

/// Keys only ever written for full-fidelity vessels.
const FULL_ONLY_VESSEL_KEYS: &[&str] = &[
    "isCommandable",
    "isEVA",
    "missionTime",
    "landedAt",
    "landed",
    "crewCapacity",
    "crewCount",
    "crew",
    "currentStage",
    "centerOfMass",
    "heightFromSurface",
    "terrainNormal",
    "orbitVelocity",
    "staticPressure",
    "orbit",
];

fn fixture_state() -> GameState {
    serde_yml::from_str(FIXTURE).unwrap()
}

fn snapshot() -> Value {
    serde_json::from_str(&build_snapshot(&fixture_state()).unwrap()).unwrap()
}

fn object(value: &Value) -> &Map<String, Value> {
    value.as_object().unwrap()
}

#[test]
fn fixture_snapshot_is_valid_json_with_top_level_fields() {
    let value = snapshot();
    assert_eq!(value["currentScene"], "flight");
    assert_eq!(value["isFlight"], true);
    assert_eq!(value["isEditor"], false);
    assert_eq!(value["game"]["title"], "Mun or Bust");
    assert_eq!(value["game"]["mode"], "career");
    assert!(value["universalTime"].as_f64().unwrap() > 5_000_000.0);
}

#[test]
fn active_vessel_carries_full_fields() {
    let value = snapshot();
    let active = object(&value["flightGlobals"]["activeVessel"]);

    assert_eq!(active["id"], ACTIVE_ID);
    assert_eq!(active["type"], "Ship");
    for key in FULL_ONLY_VESSEL_KEYS {
        assert!(active.contains_key(*key), "missing {key}");
    }
    assert_eq!(active["crewCount"], 3);
    assert_eq!(object(&active["crew"]).len(), 3);
    assert_eq!(active["crew"]["Bill Kerman"]["stupidity"], 0.8);
    assert_eq!(active["terrainNormal"].as_array().unwrap().len(), 3);
}

#[test]
fn other_vessels_carry_no_full_fields() {
    let value = snapshot();
    let vessels = object(&value["flightGlobals"]["vessels"]);

    assert_eq!(vessels.len(), 2);
    assert!(!vessels.contains_key(ACTIVE_ID));
    for id in [PROBE_ID, DEBRIS_ID] {
        let vessel = object(&vessels[id]);
        assert_eq!(vessel["id"], id);
        for key in FULL_ONLY_VESSEL_KEYS {
            assert!(!vessel.contains_key(*key), "{id} has full-only key {key}");
        }
        assert!(vessel.contains_key("latitude"));
        assert!(vessel.contains_key("celestialBody"));
    }
    assert_eq!(vessels[PROBE_ID]["celestialBody"]["name"], "Mun");
    assert_eq!(vessels[DEBRIS_ID]["type"], "Debris");
}

#[test]
fn back_references_use_index_fidelity() {
    let value = snapshot();
    let globals = &value["flightGlobals"];
    let index_body = |name: &str, index: u32| serde_json::json!({ "name": name, "index": index });

    assert_eq!(globals["activeVessel"]["celestialBody"], index_body("Kerbin", 1));
    assert_eq!(
        globals["activeVessel"]["orbit"]["closestEncounterBody"],
        index_body("Mun", 2)
    );
    assert_eq!(globals["bodies"]["1"]["referenceBody"], index_body("Sun", 0));
    assert_eq!(globals["bodies"]["2"]["referenceBody"], index_body("Kerbin", 1));
}

#[test]
fn body_table_is_keyed_by_index() {
    let value = snapshot();
    let bodies = object(&value["flightGlobals"]["bodies"]);

    let mut keys: Vec<_> = bodies.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["0", "1", "2"]);
    assert_eq!(bodies["1"]["atmosphereDepth"], 70_000);
    assert!(!object(&bodies["2"]).contains_key("atmosphereDepth"));
    assert!(!object(&bodies["0"]).contains_key("referenceBody"));
}

#[test]
fn snapshots_follow_provider_updates() {
    let shared = SharedState::new(fixture_state());
    let before: Value = serde_json::from_str(&capture_snapshot(&shared).unwrap()).unwrap();

    shared.update(|state| state.scene_code = 5);
    let after: Value = serde_json::from_str(&capture_snapshot(&shared).unwrap()).unwrap();

    assert_eq!(before["currentScene"], "flight");
    assert_eq!(after["currentScene"], "spaceCenter");
    assert!(after.get("flightGlobals").is_none());
    assert_eq!(after["game"], before["game"]);
}
