//! The heartbeat polling loop.
//!
//! [`HeartbeatClient`] polls a [`SnapshotSource`] on a fixed cadence with
//! exactly one request outstanding. Each attempt is bounded by the
//! request timeout; its outcome feeds the [`Liveness`] machines, and the
//! resulting transitions and snapshots are handed to a
//! [`HeartbeatListener`] in that order.
//!
//! The next attempt starts one interval after the previous one started,
//! or immediately if the previous attempt took longer than that.

use std::future::Future;
use std::time::Duration;

use reqwest::header;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::config::HeartbeatConfig;
use crate::error::ClientError;
use crate::liveness::{LinkStatus, Liveness, Transition};
use crate::snapshot::Snapshot;

/// Where snapshots come from.
pub trait SnapshotSource: Send + Sync + 'static {
    /// Fetch one snapshot.
    fn fetch(&self) -> impl Future<Output = Result<Snapshot, ClientError>> + Send;
}

/// Receives liveness transitions and fresh snapshots from the loop.
///
/// Both methods default to doing nothing.
pub trait HeartbeatListener: Send + 'static {
    /// A liveness flag changed.
    fn on_transition(&mut self, _transition: Transition) {}

    /// A snapshot arrived.
    fn on_data(&mut self, _snapshot: &Snapshot) {}
}

impl HeartbeatListener for () {}

// ---------------------------------------------------------------------------
// HTTP source
// ---------------------------------------------------------------------------

/// Fetches snapshots with an HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    /// Poll `url` with a fresh HTTP client.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// The polled URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SnapshotSource for HttpSource {
    async fn fetch(&self) -> Result<Snapshot, ClientError> {
        let response = self
            .client
            .get(&self.url)
            .header(header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("snapshot request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ClientError::Malformed(format!("snapshot parse failed: {e}")))?;

        Snapshot::from_value(json)
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Polls a source and tracks connection and service liveness.
#[derive(Debug)]
pub struct HeartbeatClient<S> {
    source: S,
    interval: Duration,
    request_timeout: Duration,
    liveness: Liveness,
    latest: Option<Snapshot>,
    status: watch::Sender<LinkStatus>,
}

impl<S: SnapshotSource> HeartbeatClient<S> {
    /// Create a client with both flags down and nothing polled yet.
    pub fn new(source: S, config: &HeartbeatConfig) -> Self {
        let (status, _) = watch::channel(LinkStatus::default());
        Self {
            source,
            interval: config.heartbeat_interval,
            request_timeout: config.request_timeout,
            liveness: Liveness::new(config.service_timeout),
            latest: None,
            status,
        }
    }

    /// Watch the liveness flags.
    pub fn status(&self) -> watch::Receiver<LinkStatus> {
        self.status.subscribe()
    }

    /// Current liveness flags.
    pub const fn link_status(&self) -> LinkStatus {
        self.liveness.status()
    }

    /// The most recent successfully polled snapshot.
    pub const fn latest(&self) -> Option<&Snapshot> {
        self.latest.as_ref()
    }

    /// Make one attempt and report its effects to `listener`.
    ///
    /// Returns the failure reason when the attempt failed; the failure
    /// has already been applied to the liveness flags.
    pub async fn poll_once<L>(&mut self, listener: &mut L) -> Result<(), ClientError>
    where
        L: HeartbeatListener + ?Sized,
    {
        let outcome = match tokio::time::timeout(self.request_timeout, self.source.fetch()).await {
            Ok(result) => result,
            Err(_elapsed) => Err(ClientError::Timeout(self.request_timeout)),
        };
        let now = Instant::now();

        match outcome {
            Ok(snapshot) => {
                let transitions = self.liveness.on_success(now);
                self.publish(listener, &transitions);
                listener.on_data(&snapshot);
                self.latest = Some(snapshot);
                Ok(())
            }
            Err(e) => {
                let transitions = self.liveness.on_failure(now);
                self.publish(listener, &transitions);
                Err(e)
            }
        }
    }

    /// Poll until `stop` fires or its sender is dropped.
    pub async fn run<L>(&mut self, listener: &mut L, mut stop: oneshot::Receiver<()>)
    where
        L: HeartbeatListener + ?Sized,
    {
        loop {
            let started = Instant::now();

            tokio::select! {
                _ = &mut stop => break,
                result = self.poll_once(&mut *listener) => {
                    if let Err(e) = result {
                        debug!(error = %e, "heartbeat attempt failed");
                    }
                }
            }

            let next = started.checked_add(self.interval).unwrap_or(started);
            tokio::select! {
                _ = &mut stop => break,
                () = tokio::time::sleep_until(next) => {}
            }
        }
        debug!("heartbeat loop stopped");
    }

    /// Run the loop on a background task.
    ///
    /// The listener is returned by [`HeartbeatHandle::stop`].
    pub fn start<L: HeartbeatListener>(mut self, mut listener: L) -> HeartbeatHandle<L> {
        let (stop, stopped) = oneshot::channel();
        let status = self.status();
        info!(
            interval_ms = self.interval.as_millis(),
            request_timeout_ms = self.request_timeout.as_millis(),
            "heartbeat started"
        );
        let task = tokio::spawn(async move {
            self.run(&mut listener, stopped).await;
            listener
        });
        HeartbeatHandle { status, stop, task }
    }

    fn publish<L>(&self, listener: &mut L, transitions: &[Transition])
    where
        L: HeartbeatListener + ?Sized,
    {
        if transitions.is_empty() {
            return;
        }
        for &transition in transitions {
            info!(?transition, "liveness changed");
            listener.on_transition(transition);
        }
        self.status.send_replace(self.liveness.status());
    }
}

/// Handle to a heartbeat loop running on a background task.
///
/// Dropping the handle stops the loop at its next await point.
#[derive(Debug)]
pub struct HeartbeatHandle<L> {
    status: watch::Receiver<LinkStatus>,
    stop: oneshot::Sender<()>,
    task: JoinHandle<L>,
}

impl<L> HeartbeatHandle<L> {
    /// Current liveness flags.
    pub fn status(&self) -> LinkStatus {
        *self.status.borrow()
    }

    /// Watch the liveness flags.
    pub fn subscribe(&self) -> watch::Receiver<LinkStatus> {
        self.status.clone()
    }

    /// Stop the loop and take back the listener.
    ///
    /// Returns `None` if the loop task panicked.
    pub async fn stop(self) -> Option<L> {
        // The loop may already have exited; then there is nothing to stop.
        let _ = self.stop.send(());
        match self.task.await {
            Ok(listener) => Some(listener),
            Err(e) => {
                error!(error = %e, "heartbeat task failed");
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Succeeds on the listed call numbers, fails otherwise.
    struct Scripted {
        calls: Arc<AtomicUsize>,
        ok: fn(usize) -> bool,
    }

    impl SnapshotSource for Scripted {
        async fn fetch(&self) -> Result<Snapshot, ClientError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if (self.ok)(call) {
                Snapshot::parse(r#"{"currentScene": "flight"}"#)
            } else {
                Err(ClientError::Transport("refused".to_owned()))
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        transitions: Vec<Transition>,
        data: usize,
    }

    impl HeartbeatListener for Recorder {
        fn on_transition(&mut self, transition: Transition) {
            self.transitions.push(transition);
        }

        fn on_data(&mut self, _snapshot: &Snapshot) {
            self.data += 1;
        }
    }

    fn client(ok: fn(usize) -> bool) -> HeartbeatClient<Scripted> {
        let source = Scripted {
            calls: Arc::new(AtomicUsize::new(0)),
            ok,
        };
        HeartbeatClient::new(source, &HeartbeatConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn success_reports_transitions_before_data() {
        let mut client = client(|_| true);
        let mut recorder = Recorder::default();

        client.poll_once(&mut recorder).await.unwrap();

        assert_eq!(
            recorder.transitions,
            vec![Transition::ServiceUp, Transition::ConnectionUp]
        );
        assert_eq!(recorder.data, 1);
        assert_eq!(client.latest().unwrap().scene_name(), "flight");
        assert!(client.status().borrow().service_up);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_keeps_the_last_snapshot() {
        let mut client = client(|call| call == 0);
        let mut recorder = Recorder::default();

        client.poll_once(&mut recorder).await.unwrap();
        let err = client.poll_once(&mut recorder).await.unwrap_err();

        assert!(matches!(err, ClientError::Transport(_)));
        assert_eq!(recorder.transitions.last(), Some(&Transition::ConnectionDown));
        assert!(client.latest().is_some());
        assert_eq!(
            client.link_status(),
            LinkStatus {
                connection_up: false,
                service_up: true,
            }
        );
    }
}
