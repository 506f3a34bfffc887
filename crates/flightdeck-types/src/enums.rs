//! Enumeration types for the observable game state.
//!
//! [`Scene`] carries the fixed table that maps the simulation's internal
//! scene codes to stable public names. The public names are part of the
//! wire format and must never change; new scenes are appended.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Scenes
// ---------------------------------------------------------------------------

/// The scene the simulation currently has loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Scene {
    /// Initial asset loading.
    Loading,
    /// Transitional loading between two scenes.
    LoadingBuffer,
    /// The main menu.
    MainMenu,
    /// The settings screen.
    Settings,
    /// The credits roll.
    Credits,
    /// The space center overview.
    SpaceCenter,
    /// The vertical assembly editor.
    Editor,
    /// Controlling a vessel in flight.
    Flight,
    /// The tracking station map.
    TrackingStation,
    /// The horizontal (spaceplane) editor.
    PlaneEditor,
    /// The planetarium view.
    Planetarium,
    /// Any code that is not in the table.
    #[default]
    Unknown,
}

/// Scene codes as reported by the simulation, in table order.
const SCENE_TABLE: [(i32, Scene); 11] = [
    (0, Scene::Loading),
    (1, Scene::LoadingBuffer),
    (2, Scene::MainMenu),
    (3, Scene::Settings),
    (4, Scene::Credits),
    (5, Scene::SpaceCenter),
    (6, Scene::Editor),
    (7, Scene::Flight),
    (8, Scene::TrackingStation),
    (9, Scene::PlaneEditor),
    (10, Scene::Planetarium),
];

impl Scene {
    /// Map a provider scene code to its scene, [`Scene::Unknown`] if unmapped.
    pub fn from_code(code: i32) -> Self {
        SCENE_TABLE
            .iter()
            .find(|(c, _)| *c == code)
            .map_or(Self::Unknown, |(_, scene)| *scene)
    }

    /// The provider scene code for this scene, if it has one.
    pub fn code(self) -> Option<i32> {
        SCENE_TABLE
            .iter()
            .find(|(_, scene)| *scene == self)
            .map(|(code, _)| *code)
    }

    /// Stable public name used on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::LoadingBuffer => "loadingBuffer",
            Self::MainMenu => "mainMenu",
            Self::Settings => "settings",
            Self::Credits => "credits",
            Self::SpaceCenter => "spaceCenter",
            Self::Editor => "editor",
            Self::Flight => "flight",
            Self::TrackingStation => "trackingStation",
            Self::PlaneEditor => "planeEditor",
            Self::Planetarium => "planetarium",
            Self::Unknown => "unknown",
        }
    }

    /// Human-readable name for dashboards.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Loading | Self::LoadingBuffer => "Loading",
            Self::MainMenu => "Main Menu",
            Self::Settings => "Settings",
            Self::Credits => "Credits",
            Self::SpaceCenter => "Space Center",
            Self::Editor => "Vehicle Assembly Building",
            Self::Flight => "In Flight",
            Self::TrackingStation => "Tracking Station",
            Self::PlaneEditor => "Spaceplane Hangar",
            Self::Planetarium => "Planetarium",
            Self::Unknown => "Unknown",
        }
    }

    /// Whether a game is being played (not a menu, splash or loading screen).
    pub const fn is_in_game(self) -> bool {
        !matches!(
            self,
            Self::Loading | Self::LoadingBuffer | Self::MainMenu | Self::Settings | Self::Credits
        )
    }

    /// Whether this scene is one of the vessel editors.
    pub const fn is_editor(self) -> bool {
        matches!(self, Self::Editor | Self::PlaneEditor)
    }

    /// Whether this scene is in flight.
    pub const fn is_flight(self) -> bool {
        matches!(self, Self::Flight)
    }
}

impl core::fmt::Display for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A public scene name that is not in the scene table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scene name: {0}")]
pub struct UnknownScene(pub String);

impl FromStr for Scene {
    type Err = UnknownScene;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::Unknown.as_str() {
            return Ok(Self::Unknown);
        }
        SCENE_TABLE
            .iter()
            .map(|(_, scene)| *scene)
            .find(|scene| scene.as_str() == s)
            .ok_or_else(|| UnknownScene(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Vessels
// ---------------------------------------------------------------------------

/// Classification of a vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VesselType {
    /// Detached parts and spent stages.
    Debris,
    /// Asteroids and comets.
    SpaceObject,
    /// Unclassified.
    #[default]
    Unknown,
    /// Uncrewed probe.
    Probe,
    /// Communications relay.
    Relay,
    /// Ground rover.
    Rover,
    /// Lander.
    Lander,
    /// Crewed ship.
    Ship,
    /// Aircraft.
    Plane,
    /// Orbital station.
    Station,
    /// Surface base.
    Base,
    /// A crew member on extra-vehicular activity.
    #[serde(rename = "EVA")]
    Eva,
    /// A planted flag.
    Flag,
}

impl VesselType {
    /// Name used on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debris => "Debris",
            Self::SpaceObject => "SpaceObject",
            Self::Unknown => "Unknown",
            Self::Probe => "Probe",
            Self::Relay => "Relay",
            Self::Rover => "Rover",
            Self::Lander => "Lander",
            Self::Ship => "Ship",
            Self::Plane => "Plane",
            Self::Station => "Station",
            Self::Base => "Base",
            Self::Eva => "EVA",
            Self::Flag => "Flag",
        }
    }
}

// ---------------------------------------------------------------------------
// Runs
// ---------------------------------------------------------------------------

/// The rule set of the current game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Everything unlocked, no economy.
    #[default]
    Sandbox,
    /// Science points unlock technology, no funds.
    Science,
    /// Funds, reputation and science.
    Career,
}

impl GameMode {
    /// Name used on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Science => "science",
            Self::Career => "career",
        }
    }
}
