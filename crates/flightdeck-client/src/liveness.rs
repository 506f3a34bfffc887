//! Connection and service liveness.
//!
//! [`Liveness`] is a pure state machine fed with the outcome and time of
//! each poll attempt. It tracks two independent flags:
//!
//! - **connection** follows the most recent attempt: up after any
//!   success, down after any failure.
//! - **service** goes up on any success and only goes down after a
//!   failure when the last success is older than the service timeout.
//!
//! Both start down. Each call returns the transitions it caused, so a
//! flag that is already in the new state never fires twice.

use std::time::Duration;

use tokio::time::Instant;

/// A change of one liveness flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// The service became reachable.
    ServiceUp,
    /// No success within the service timeout.
    ServiceDown,
    /// The most recent request succeeded after a failure.
    ConnectionUp,
    /// The most recent request failed after a success.
    ConnectionDown,
}

/// Snapshot of both liveness flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStatus {
    /// Whether the most recent request succeeded.
    pub connection_up: bool,
    /// Whether any request succeeded within the service timeout.
    pub service_up: bool,
}

/// The two liveness state machines.
#[derive(Debug, Clone)]
pub struct Liveness {
    status: LinkStatus,
    last_success: Option<Instant>,
    service_timeout: Duration,
}

impl Liveness {
    /// Both flags down, no success seen yet.
    pub const fn new(service_timeout: Duration) -> Self {
        Self {
            status: LinkStatus {
                connection_up: false,
                service_up: false,
            },
            last_success: None,
            service_timeout,
        }
    }

    /// Current flags.
    pub const fn status(&self) -> LinkStatus {
        self.status
    }

    /// When the last successful attempt completed.
    pub const fn last_success(&self) -> Option<Instant> {
        self.last_success
    }

    /// Record a successful attempt completed at `now`.
    pub fn on_success(&mut self, now: Instant) -> Vec<Transition> {
        let mut transitions = Vec::with_capacity(2);
        self.last_success = Some(now);
        if !self.status.service_up {
            self.status.service_up = true;
            transitions.push(Transition::ServiceUp);
        }
        if !self.status.connection_up {
            self.status.connection_up = true;
            transitions.push(Transition::ConnectionUp);
        }
        transitions
    }

    /// Record a failed attempt completed at `now`.
    pub fn on_failure(&mut self, now: Instant) -> Vec<Transition> {
        let mut transitions = Vec::with_capacity(2);
        if self.status.connection_up {
            self.status.connection_up = false;
            transitions.push(Transition::ConnectionDown);
        }
        let expired = self
            .last_success
            .is_some_and(|last| now.saturating_duration_since(last) > self.service_timeout);
        if expired && self.status.service_up {
            self.status.service_up = false;
            transitions.push(Transition::ServiceDown);
        }
        transitions
    }
}
