//! The seam between the simulation host and the snapshot builder.
//!
//! The host implements [`StateProvider`] to hand out a consistent copy of
//! its state on demand. [`SharedState`] is the default implementation: the
//! host writes into it whenever its state changes and every snapshot
//! request reads an independent clone under the lock.

use std::sync::{Arc, PoisonError, RwLock};

use crate::structs::GameState;

/// Source of consistent game-state copies.
///
/// `capture` may be called concurrently from several request workers and
/// may block; callers run it off the async executor.
pub trait StateProvider: Send + Sync + 'static {
    /// Return a consistent, independently owned copy of the current state.
    fn capture(&self) -> GameState;
}

/// Lock-guarded game state shared between the host and the server.
///
/// Cloning a `SharedState` clones the handle, not the state.
#[derive(Debug, Clone, Default)]
pub struct SharedState {
    inner: Arc<RwLock<GameState>>,
}

impl SharedState {
    /// Create a shared state holding `state`.
    pub fn new(state: GameState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// Replace the whole state.
    pub fn replace(&self, state: GameState) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = state;
    }

    /// Mutate the state in place under the write lock.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut GameState),
    {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }
}

impl StateProvider for SharedState {
    fn capture(&self) -> GameState {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
