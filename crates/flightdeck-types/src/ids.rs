//! Identifier newtypes.
//!
//! Vessels are identified by a UUID that stays stable for the lifetime of
//! the craft. Celestial bodies are identified by their position in the
//! simulation's global body table, which is fixed for a running game.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VesselId(pub Uuid);

impl VesselId {
    /// Create a new random vessel identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for VesselId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for VesselId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for VesselId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Position of a celestial body in the global body table.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BodyIndex(pub u32);

impl BodyIndex {
    /// Return the raw index value.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for BodyIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
