//! Change detection between consecutive snapshots.
//!
//! [`ChangeDetector`] remembers the scene, active vessel id and parent
//! body index of the previous snapshot. For every new snapshot it fires a
//! change event per field that differs, then `dataUpdate`. Liveness
//! transitions are forwarded as their own events plus the matching
//! `serviceUpdate` or `connectionUpdate` with the new flag value.

use crate::events::{EventBus, EventKind, EventPayload};
use crate::heartbeat::HeartbeatListener;
use crate::liveness::Transition;
use crate::snapshot::Snapshot;

/// Turns snapshots and liveness transitions into named events.
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    events: EventBus,
    scene: String,
    vessel_id: String,
    body_index: Option<i64>,
}

impl ChangeDetector {
    /// Create a detector that raises events on `events`.
    ///
    /// Nothing has been seen yet: the first snapshot with a scene fires
    /// `sceneChange`.
    pub fn new(events: EventBus) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    /// The registry events are raised on.
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    /// Compare `snapshot` with the previous one and fire events.
    pub fn update(&mut self, snapshot: &Snapshot) {
        let scene = snapshot.scene_name();
        if scene != self.scene {
            scene.clone_into(&mut self.scene);
            self.events
                .emit(EventKind::SceneChange, &EventPayload::Scene(scene));
        }

        let vessel_id = snapshot.active_vessel_id();
        if vessel_id != self.vessel_id {
            vessel_id.clone_into(&mut self.vessel_id);
            self.events.emit(
                EventKind::ActiveVesselChange,
                &EventPayload::Vessel(snapshot.active_vessel()),
            );
        }

        let body_index = snapshot.current_body_index();
        if body_index != self.body_index {
            self.body_index = body_index;
            self.events.emit(
                EventKind::CurrentBodyChange,
                &EventPayload::Body(snapshot.current_body()),
            );
        }

        self.events
            .emit(EventKind::DataUpdate, &EventPayload::Data(snapshot));
    }
}

impl HeartbeatListener for ChangeDetector {
    fn on_transition(&mut self, transition: Transition) {
        let (kind, update, up) = match transition {
            Transition::ServiceUp => (EventKind::ServiceUp, EventKind::ServiceUpdate, true),
            Transition::ServiceDown => (EventKind::ServiceDown, EventKind::ServiceUpdate, false),
            Transition::ConnectionUp => {
                (EventKind::ConnectionUp, EventKind::ConnectionUpdate, true)
            }
            Transition::ConnectionDown => {
                (EventKind::ConnectionDown, EventKind::ConnectionUpdate, false)
            }
        };
        self.events.emit(kind, &EventPayload::Empty);
        self.events.emit(update, &EventPayload::Status(up));
    }

    fn on_data(&mut self, snapshot: &Snapshot) {
        self.update(snapshot);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;

    /// Records `(event, detail)` for every event fired.
    fn recording_bus() -> (EventBus, Arc<Mutex<Vec<(EventKind, String)>>>) {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for kind in EventKind::ALL {
            let sink = Arc::clone(&log);
            bus.on(&format!("test.{kind}"), move |payload| {
                let detail = match payload {
                    EventPayload::Empty | EventPayload::Data(_) => String::new(),
                    EventPayload::Scene(name) => (*name).to_owned(),
                    EventPayload::Vessel(v) | EventPayload::Body(v) => {
                        v.map_or_else(|| "none".to_owned(), |v| v["name"].to_string())
                    }
                    EventPayload::Status(up) => up.to_string(),
                };
                sink.lock().unwrap().push((kind, detail));
            })
            .unwrap();
        }
        (bus, log)
    }

    fn snapshot(scene: &str, vessel: &str, body: i64) -> Snapshot {
        Snapshot::from_value(json!({
            "currentScene": scene,
            "flightGlobals": {
                "activeVessel": {
                    "id": vessel,
                    "name": vessel,
                    "altitude": 1000.5,
                    "celestialBody": { "name": format!("body-{body}"), "index": body }
                }
            }
        }))
        .unwrap()
    }

    fn kinds(log: &Mutex<Vec<(EventKind, String)>>) -> Vec<EventKind> {
        log.lock().unwrap().iter().map(|(kind, _)| *kind).collect()
    }

    #[test]
    fn first_snapshot_fires_every_change() {
        let (bus, log) = recording_bus();
        let mut detector = ChangeDetector::new(bus);

        detector.update(&snapshot("flight", "a", 1));

        assert_eq!(
            kinds(&log),
            vec![
                EventKind::SceneChange,
                EventKind::ActiveVesselChange,
                EventKind::CurrentBodyChange,
                EventKind::DataUpdate,
            ]
        );
    }

    #[test]
    fn unchanged_fields_fire_only_data_update() {
        let (bus, log) = recording_bus();
        let mut detector = ChangeDetector::new(bus);
        detector.update(&snapshot("flight", "a", 1));
        log.lock().unwrap().clear();

        detector.update(&snapshot("flight", "a", 1));

        assert_eq!(kinds(&log), vec![EventKind::DataUpdate]);
    }

    #[test]
    fn scene_change_fires_once_with_the_new_scene() {
        let (bus, log) = recording_bus();
        let mut detector = ChangeDetector::new(bus);
        detector.update(&snapshot("flight", "a", 1));
        log.lock().unwrap().clear();

        detector.update(&snapshot("trackingStation", "a", 1));

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                (EventKind::SceneChange, "trackingStation".to_owned()),
                (EventKind::DataUpdate, String::new()),
            ]
        );
    }

    #[test]
    fn vessel_and_body_changes_carry_their_blocks() {
        let (bus, log) = recording_bus();
        let mut detector = ChangeDetector::new(bus);
        detector.update(&snapshot("flight", "a", 1));
        log.lock().unwrap().clear();

        detector.update(&snapshot("flight", "b", 2));

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                (EventKind::ActiveVesselChange, "\"b\"".to_owned()),
                (EventKind::CurrentBodyChange, "\"body-2\"".to_owned()),
                (EventKind::DataUpdate, String::new()),
            ]
        );
    }

    #[test]
    fn leaving_flight_reports_no_vessel() {
        let (bus, log) = recording_bus();
        let mut detector = ChangeDetector::new(bus);
        detector.update(&snapshot("flight", "a", 1));
        log.lock().unwrap().clear();

        detector.update(&Snapshot::parse(r#"{"currentScene": "spaceCenter"}"#).unwrap());

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                (EventKind::SceneChange, "spaceCenter".to_owned()),
                (EventKind::ActiveVesselChange, "none".to_owned()),
                (EventKind::CurrentBodyChange, "none".to_owned()),
                (EventKind::DataUpdate, String::new()),
            ]
        );
    }

    #[test]
    fn transitions_fire_event_then_flag_update() {
        let (bus, log) = recording_bus();
        let mut detector = ChangeDetector::new(bus);

        detector.on_transition(Transition::ServiceUp);
        detector.on_transition(Transition::ConnectionDown);

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                (EventKind::ServiceUp, String::new()),
                (EventKind::ServiceUpdate, "true".to_owned()),
                (EventKind::ConnectionDown, String::new()),
                (EventKind::ConnectionUpdate, "false".to_owned()),
            ]
        );
    }
}
