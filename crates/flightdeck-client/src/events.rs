//! Named events and the namespaced subscription registry.
//!
//! Callbacks are registered with an event selector of the form
//! `namespace.eventName`, or a bare `eventName` whose namespace is the
//! event name itself. Segments after the second dot are ignored, so
//! `hud.sceneChange.extra` is the same selector as `hud.sceneChange`. Each `(event, namespace)` pair holds at most one
//! callback: registering again replaces it, and `off` with the same
//! selector removes only that callback.
//!
//! [`EventBus`] is a cheap handle; clones share one registry, so a host
//! can keep subscribing after handing a clone to the heartbeat task.

use core::fmt;
use core::str::FromStr;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use crate::error::ClientError;
use crate::snapshot::Snapshot;

/// Every event the client raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    /// The scene changed; payload is the new scene name.
    SceneChange,
    /// The active vessel changed; payload is its block.
    ActiveVesselChange,
    /// The active vessel's parent body changed; payload is the body reference.
    CurrentBodyChange,
    /// A new snapshot arrived.
    DataUpdate,
    /// The service came up.
    ServiceUp,
    /// The service went down.
    ServiceDown,
    /// The service flag changed; payload is the new value.
    ServiceUpdate,
    /// The connection came up.
    ConnectionUp,
    /// The connection went down.
    ConnectionDown,
    /// The connection flag changed; payload is the new value.
    ConnectionUpdate,
}

impl EventKind {
    /// Every event, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::SceneChange,
        Self::ActiveVesselChange,
        Self::CurrentBodyChange,
        Self::DataUpdate,
        Self::ServiceUp,
        Self::ServiceDown,
        Self::ServiceUpdate,
        Self::ConnectionUp,
        Self::ConnectionDown,
        Self::ConnectionUpdate,
    ];

    /// Name used in event selectors.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SceneChange => "sceneChange",
            Self::ActiveVesselChange => "activeVesselChange",
            Self::CurrentBodyChange => "currentBodyChange",
            Self::DataUpdate => "dataUpdate",
            Self::ServiceUp => "serviceUp",
            Self::ServiceDown => "serviceDown",
            Self::ServiceUpdate => "serviceUpdate",
            Self::ConnectionUp => "connectionUp",
            Self::ConnectionDown => "connectionDown",
            Self::ConnectionUpdate => "connectionUpdate",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ClientError::UnknownEvent(s.to_owned()))
    }
}

/// Data passed to a callback.
#[derive(Debug, Clone, Copy)]
pub enum EventPayload<'a> {
    /// No data.
    Empty,
    /// The new scene name.
    Scene(&'a str),
    /// The new active vessel block, `None` when no vessel is active.
    Vessel(Option<&'a Value>),
    /// The new parent body reference, `None` when unknown.
    Body(Option<&'a Value>),
    /// The new value of a liveness flag.
    Status(bool),
    /// The snapshot that just arrived.
    Data(&'a Snapshot),
}

type Callback = Arc<dyn Fn(&EventPayload<'_>) + Send + Sync>;

type Registry = BTreeMap<EventKind, BTreeMap<String, Callback>>;

/// Shared, namespaced callback registry.
#[derive(Clone, Default)]
pub struct EventBus {
    callbacks: Arc<Mutex<Registry>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.lock();
        let counts: BTreeMap<&str, usize> = registry
            .iter()
            .map(|(kind, by_ns)| (kind.as_str(), by_ns.len()))
            .collect();
        f.debug_struct("EventBus").field("callbacks", &counts).finish()
    }
}

impl EventBus {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` under `selector`, replacing any callback already
    /// registered for the same namespace and event.
    pub fn on<F>(&self, selector: &str, callback: F) -> Result<(), ClientError>
    where
        F: Fn(&EventPayload<'_>) + Send + Sync + 'static,
    {
        let (namespace, kind) = parse_selector(selector)?;
        self.lock()
            .entry(kind)
            .or_default()
            .insert(namespace.to_owned(), Arc::new(callback));
        Ok(())
    }

    /// Remove the callback registered under `selector`.
    ///
    /// Unknown events and namespaces are ignored.
    pub fn off(&self, selector: &str) {
        let Ok((namespace, kind)) = parse_selector(selector) else {
            return;
        };
        if let Some(by_ns) = self.lock().get_mut(&kind) {
            by_ns.remove(namespace);
        }
    }

    /// Number of callbacks registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.lock().get(&kind).map_or(0, BTreeMap::len)
    }

    /// Call every callback registered for `kind`, in namespace order.
    ///
    /// The registry lock is released before callbacks run, so a callback
    /// may itself call [`EventBus::on`] or [`EventBus::off`].
    pub fn emit(&self, kind: EventKind, payload: &EventPayload<'_>) {
        let callbacks: Vec<Callback> = self
            .lock()
            .get(&kind)
            .map(|by_ns| by_ns.values().cloned().collect())
            .unwrap_or_default();
        for callback in callbacks {
            callback(payload);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.callbacks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Split `namespace.event` (or bare `event`) into its parts.
///
/// Only the first two dot-separated segments are read.
fn parse_selector(selector: &str) -> Result<(&str, EventKind), ClientError> {
    let mut segments = selector.split('.');
    let namespace = segments.next().unwrap_or(selector);
    let event = segments.next().unwrap_or(namespace);
    Ok((namespace, event.parse()?))
}
