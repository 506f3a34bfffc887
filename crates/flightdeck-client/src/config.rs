//! Configuration for the polling client.
//!
//! Defaults match a dashboard polling a local server. Everything can be
//! overridden from the environment with [`HeartbeatConfig::from_env`].

use std::time::Duration;

use crate::error::ClientError;

/// Default snapshot URL.
pub const DEFAULT_URL: &str = "http://127.0.0.1:7001/api/snapshot";

/// Heartbeat cadence and timeouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeartbeatConfig {
    /// Snapshot endpoint to poll.
    pub url: String,
    /// Minimum time between the starts of two consecutive requests.
    pub heartbeat_interval: Duration,
    /// Time after which a single request is abandoned as failed.
    pub request_timeout: Duration,
    /// Time without any success after which the service is considered down.
    pub service_timeout: Duration,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_owned(),
            heartbeat_interval: Duration::from_millis(2000),
            request_timeout: Duration::from_millis(5000),
            service_timeout: Duration::from_millis(20_000),
        }
    }
}

impl HeartbeatConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional variables:
    /// - `FLIGHTDECK_URL` -- snapshot endpoint (default [`DEFAULT_URL`])
    /// - `HEARTBEAT_INTERVAL_MS` -- poll cadence in milliseconds (default 2000)
    /// - `REQUEST_TIMEOUT_MS` -- per-request timeout in milliseconds (default 5000)
    /// - `SERVICE_TIMEOUT_MS` -- service-down threshold in milliseconds (default 20000)
    pub fn from_env() -> Result<Self, ClientError> {
        let defaults = Self::default();

        let url = std::env::var("FLIGHTDECK_URL").unwrap_or(defaults.url);
        let heartbeat_interval = env_millis("HEARTBEAT_INTERVAL_MS", defaults.heartbeat_interval)?;
        let request_timeout = env_millis("REQUEST_TIMEOUT_MS", defaults.request_timeout)?;
        let service_timeout = env_millis("SERVICE_TIMEOUT_MS", defaults.service_timeout)?;

        let config = Self {
            url,
            heartbeat_interval,
            request_timeout,
            service_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the heartbeat loop cannot run with.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.url.is_empty() {
            return Err(ClientError::Config("snapshot URL is empty".to_owned()));
        }
        if self.request_timeout.is_zero() {
            return Err(ClientError::Config(
                "request timeout must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Read an optional duration in milliseconds.
fn env_millis(name: &str, default: Duration) -> Result<Duration, ClientError> {
    match std::env::var(name) {
        Ok(value) => parse_millis(name, &value),
        Err(_) => Ok(default),
    }
}

fn parse_millis(name: &str, value: &str) -> Result<Duration, ClientError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| ClientError::Config(format!("invalid {name}: {e}")))
}
