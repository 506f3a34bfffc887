//! Observer server startup helper for embedding in a host process.
//!
//! Provides [`spawn_observer`] which binds the listener and launches the
//! Observer HTTP server on a background Tokio task. The host keeps the
//! returned [`RunningObserver`] and stops the server through it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use flightdeck_observer::{AppState, ServerConfig, SiteConfig, spawn_observer};
//! use flightdeck_types::SharedState;
//!
//! let shared = SharedState::default();
//! let state = Arc::new(AppState::new(Arc::new(shared.clone()), SiteConfig::default()));
//! let observer = spawn_observer(&ServerConfig::default(), state).await?;
//! // The host keeps updating `shared`; observers see each new copy.
//! observer.stop().await;
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the Observer server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Handle to an Observer server running on a background task.
#[derive(Debug)]
pub struct RunningObserver {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl RunningObserver {
    /// The address the server is listening on.
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn stop(self) {
        // The task may already have exited; then there is nothing to stop.
        let _ = self.shutdown.send(());
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "Observer server task failed");
        }
    }

    /// Abort the server task without waiting for in-flight requests.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

/// Spawn the Observer HTTP server on a background Tokio task.
///
/// The listener is bound before the task is spawned, so bind failures are
/// reported here rather than logged from the background task. Binding
/// port `0` picks a free port; see [`RunningObserver::local_addr`].
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the address is invalid or cannot
/// be bound.
pub async fn spawn_observer(
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<RunningObserver, StartupError> {
    let listener = config.bind().await?;
    let local_addr = listener
        .local_addr()
        .map_err(|e| ServerError::Bind(format!("listener has no local address: {e}")))?;

    let (shutdown, stopped) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        let signal = async move {
            let _ = stopped.await;
        };
        if let Err(e) = crate::server::serve(listener, state, signal).await {
            tracing::error!(error = %e, "Observer server exited with error");
        }
    });

    tracing::info!(%local_addr, "Observer server spawned on background task");

    Ok(RunningObserver {
        local_addr,
        shutdown,
        handle,
    })
}
