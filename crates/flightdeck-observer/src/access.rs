//! Caller address filtering.
//!
//! By default only callers on the local machine or a private network are
//! served: IPv4 `10.0.0.0/8`, `127.0.0.0/8`, `172.16.0.0/12` and
//! `192.168.0.0/16`, the IPv6 loopback `::1`, and IPv4-mapped IPv6
//! addresses in those IPv4 ranges. `access.allow_public` turns the check
//! off.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use crate::error::ObserverError;
use crate::state::AppState;

/// Whether `ip` is in a loopback or private range.
pub fn is_private_or_local(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_private_v4(v4),
        IpAddr::V6(v6) => v6.is_loopback() || v6.to_ipv4_mapped().is_some_and(is_private_v4),
    }
}

fn is_private_v4(ip: Ipv4Addr) -> bool {
    // Covers 10/8, 172.16/12 and 192.168/16.
    ip.is_private() || ip.is_loopback()
}

/// Middleware that answers `403` to callers outside the allowed ranges.
///
/// The caller address comes from the [`ConnectInfo`] extension installed
/// by `into_make_service_with_connect_info`. A request without one is
/// treated as coming from an unknown, and therefore public, address.
pub async fn require_private(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    debug!(
        remote = ?remote,
        method = %request.method(),
        path = %request.uri().path(),
        "request"
    );

    if state.site.allow_public {
        return next.run(request).await;
    }

    match remote {
        Some(addr) if is_private_or_local(addr.ip()) => next.run(request).await,
        _ => {
            warn!(remote = ?remote, "blocked access from public address");
            ObserverError::Forbidden.into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ip(text: &str) -> IpAddr {
        text.parse().unwrap()
    }

    #[test]
    fn private_ipv4_ranges_are_allowed() {
        for addr in [
            "10.0.0.1",
            "10.255.255.255",
            "127.0.0.1",
            "127.8.8.8",
            "172.16.0.1",
            "172.31.255.254",
            "192.168.1.10",
        ] {
            assert!(is_private_or_local(ip(addr)), "{addr}");
        }
    }

    #[test]
    fn public_ipv4_addresses_are_rejected() {
        for addr in [
            "203.0.113.5",
            "8.8.8.8",
            "172.15.255.255",
            "172.32.0.1",
            "192.169.0.1",
            "11.0.0.1",
        ] {
            assert!(!is_private_or_local(ip(addr)), "{addr}");
        }
    }

    #[test]
    fn ipv6_loopback_and_mapped_private_are_allowed() {
        assert!(is_private_or_local(ip("::1")));
        assert!(is_private_or_local(ip("::ffff:192.168.0.7")));
        assert!(is_private_or_local(ip("::ffff:127.0.0.1")));
    }

    #[test]
    fn other_ipv6_addresses_are_rejected() {
        assert!(!is_private_or_local(ip("2001:db8::1")));
        assert!(!is_private_or_local(ip("::ffff:203.0.113.5")));
    }
}
