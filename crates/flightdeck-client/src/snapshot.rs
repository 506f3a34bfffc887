//! Client-side view of one polled snapshot.
//!
//! A [`Snapshot`] is the parsed top-level JSON object, immutable once
//! built. Nested values are reached with dotted paths, for example
//! `flightGlobals.activeVessel.altitude`.

use serde_json::{Map, Value};

use flightdeck_types::Scene;

use crate::error::ClientError;

/// One parsed snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot(Map<String, Value>);

impl Snapshot {
    /// Wrap a parsed JSON value; anything but an object is malformed.
    pub fn from_value(value: Value) -> Result<Self, ClientError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ClientError::Malformed(format!(
                "expected a JSON object, got {}",
                kind_of(&other)
            ))),
        }
    }

    /// Parse snapshot text.
    pub fn parse(text: &str) -> Result<Self, ClientError> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// The top-level object.
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// The value at a dotted `path`, or `None` if any segment is missing.
    pub fn try_get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut node = self.0.get(segments.next()?)?;
        for segment in segments {
            node = node.as_object()?.get(segment)?;
        }
        Some(node)
    }

    /// The string at `path`, if present and a string.
    pub fn try_str(&self, path: &str) -> Option<&str> {
        self.try_get(path).and_then(Value::as_str)
    }

    /// The integer at `path`, if present and an integer.
    pub fn try_i64(&self, path: &str) -> Option<i64> {
        self.try_get(path).and_then(Value::as_i64)
    }

    /// The number at `path`, if present and numeric.
    pub fn try_f64(&self, path: &str) -> Option<f64> {
        self.try_get(path).and_then(Value::as_f64)
    }

    /// The boolean at `path`, if present and a boolean.
    pub fn try_bool(&self, path: &str) -> Option<bool> {
        self.try_get(path).and_then(Value::as_bool)
    }

    /// The public scene name, empty if absent.
    pub fn scene_name(&self) -> &str {
        self.try_str("currentScene").unwrap_or_default()
    }

    /// The current scene; unlisted names map to [`Scene::Unknown`].
    pub fn scene(&self) -> Option<Scene> {
        self.try_str("currentScene")
            .map(|name| name.parse().unwrap_or(Scene::Unknown))
    }

    /// Human-readable scene name, empty if the snapshot has no scene.
    pub fn scene_display_name(&self) -> &'static str {
        self.scene().map_or("", Scene::display_name)
    }

    /// Whether a game is being played rather than a menu or loading screen.
    pub fn is_in_game(&self) -> bool {
        self.scene().is_none_or(Scene::is_in_game)
    }

    /// Whether the flight scene is loaded.
    pub fn is_in_flight(&self) -> bool {
        self.try_bool("isFlight").unwrap_or(false)
    }

    /// The active vessel block, if present.
    pub fn active_vessel(&self) -> Option<&Value> {
        self.try_get("flightGlobals.activeVessel")
    }

    /// The active vessel's id, empty if there is none.
    pub fn active_vessel_id(&self) -> &str {
        self.try_str("flightGlobals.activeVessel.id")
            .unwrap_or_default()
    }

    /// The body the active vessel is orbiting, if known.
    pub fn current_body(&self) -> Option<&Value> {
        self.try_get("flightGlobals.activeVessel.celestialBody")
    }

    /// The index of [`Snapshot::current_body`], if known.
    pub fn current_body_index(&self) -> Option<i64> {
        self.try_i64("flightGlobals.activeVessel.celestialBody.index")
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn in_flight() -> Snapshot {
        Snapshot::from_value(json!({
            "currentScene": "flight",
            "isEditor": false,
            "isFlight": true,
            "flightGlobals": {
                "activeVessel": {
                    "id": "abc",
                    "altitude": 81240.5,
                    "currentStage": 2,
                    "landed": false,
                    "celestialBody": { "name": "Kerbin", "index": 1 }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn dotted_paths_reach_nested_values() {
        let snapshot = in_flight();
        assert_eq!(snapshot.try_f64("flightGlobals.activeVessel.altitude"), Some(81240.5));
        assert_eq!(snapshot.try_i64("flightGlobals.activeVessel.currentStage"), Some(2));
        assert_eq!(snapshot.try_bool("flightGlobals.activeVessel.landed"), Some(false));
        assert_eq!(
            snapshot.try_str("flightGlobals.activeVessel.celestialBody.name"),
            Some("Kerbin")
        );
    }

    #[test]
    fn missing_or_mistyped_paths_are_none() {
        let snapshot = in_flight();
        assert!(snapshot.try_get("flightGlobals.nothing").is_none());
        assert!(snapshot.try_get("currentScene.deeper").is_none());
        assert!(snapshot.try_get("").is_none());
        assert!(snapshot.try_i64("currentScene").is_none());
    }

    #[test]
    fn change_tracked_fields_have_empty_defaults() {
        let empty = Snapshot::default();
        assert_eq!(empty.scene_name(), "");
        assert_eq!(empty.active_vessel_id(), "");
        assert_eq!(empty.current_body_index(), None);

        let snapshot = in_flight();
        assert_eq!(snapshot.scene_name(), "flight");
        assert_eq!(snapshot.active_vessel_id(), "abc");
        assert_eq!(snapshot.current_body_index(), Some(1));
    }

    #[test]
    fn scene_helpers_follow_the_scene_table() {
        let snapshot = in_flight();
        assert_eq!(snapshot.scene(), Some(Scene::Flight));
        assert_eq!(snapshot.scene_display_name(), "In Flight");
        assert!(snapshot.is_in_game());
        assert!(snapshot.is_in_flight());

        let menu = Snapshot::parse(r#"{"currentScene": "mainMenu", "isFlight": false}"#).unwrap();
        assert_eq!(menu.scene_display_name(), "Main Menu");
        assert!(!menu.is_in_game());
        assert!(!menu.is_in_flight());

        let odd = Snapshot::parse(r#"{"currentScene": "somewhereElse"}"#).unwrap();
        assert_eq!(odd.scene(), Some(Scene::Unknown));
        assert_eq!(odd.scene_display_name(), "Unknown");
    }

    #[test]
    fn non_objects_are_malformed() {
        assert!(matches!(
            Snapshot::parse("[1, 2, 3]"),
            Err(ClientError::Malformed(_))
        ));
        assert!(matches!(
            Snapshot::parse("{ not json"),
            Err(ClientError::Malformed(_))
        ));
    }
}
