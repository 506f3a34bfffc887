//! Terminal watcher for a Flightdeck server.
//!
//! Polls the snapshot endpoint and logs every liveness transition and
//! change event until interrupted.
//!
//! # Environment
//!
//! See [`HeartbeatConfig::from_env`] for the recognised variables. Log
//! output is controlled by `RUST_LOG` (default `info`).

use flightdeck_client::{
    ChangeDetector, EventBus, EventPayload, HeartbeatClient, HeartbeatConfig, HttpSource,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a callback cannot
/// be registered.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = HeartbeatConfig::from_env()?;
    info!(
        url = config.url,
        heartbeat_interval_ms = config.heartbeat_interval.as_millis(),
        request_timeout_ms = config.request_timeout.as_millis(),
        service_timeout_ms = config.service_timeout.as_millis(),
        "configuration loaded"
    );

    let events = EventBus::new();
    register_logging(&events)?;

    let client = HeartbeatClient::new(HttpSource::new(config.url.clone()), &config);
    let handle = client.start(ChangeDetector::new(events));

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");

    let _ = handle.stop().await;
    Ok(())
}

/// Log every event under the `watch` namespace.
fn register_logging(events: &EventBus) -> Result<(), Box<dyn std::error::Error>> {
    events.on("watch.serviceUpdate", |payload| {
        if let EventPayload::Status(up) = payload {
            info!(up, "service");
        }
    })?;
    events.on("watch.connectionUpdate", |payload| {
        if let EventPayload::Status(up) = payload {
            info!(up, "connection");
        }
    })?;
    events.on("watch.sceneChange", |payload| {
        if let EventPayload::Scene(scene) = payload {
            info!(scene, "scene changed");
        }
    })?;
    events.on("watch.activeVesselChange", |payload| {
        if let EventPayload::Vessel(vessel) = payload {
            let name = vessel
                .and_then(|v| v.get("name"))
                .and_then(serde_json::Value::as_str)
                .unwrap_or("none");
            info!(vessel = name, "active vessel changed");
        }
    })?;
    events.on("watch.currentBodyChange", |payload| {
        if let EventPayload::Body(body) = payload {
            let name = body
                .and_then(|b| b.get("name"))
                .and_then(serde_json::Value::as_str)
                .unwrap_or("none");
            info!(body = name, "current body changed");
        }
    })?;
    events.on("watch.dataUpdate", |payload| {
        if let EventPayload::Data(snapshot) = payload {
            debug!(
                scene = snapshot.scene_name(),
                universal_time = snapshot.try_f64("universalTime"),
                "snapshot"
            );
        }
    })?;
    Ok(())
}
