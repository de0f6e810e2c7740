//! Loopback gate for tests that open local sockets.
//!
//! Some sandboxed builders refuse to bind 127.0.0.1. Socket-bound tests then
//! print a note and return early, unless `SONGGRAB_REQUIRE_SOCKET_TESTS` is
//! set to a truthy value, in which case they fail instead.

use std::net::{Ipv4Addr, TcpListener};
use std::panic::Location;

use wiremock::MockServer;

const REQUIRE_SOCKETS_ENV: &str = "SONGGRAB_REQUIRE_SOCKET_TESTS";

fn sockets_required() -> bool {
    std::env::var(REQUIRE_SOCKETS_ENV).is_ok_and(|value| {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

/// Returns true when the calling test should bail out because loopback
/// sockets cannot be bound here.
#[track_caller]
#[must_use]
pub fn loopback_unavailable() -> bool {
    let Err(error) = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)) else {
        return false;
    };

    let caller = Location::caller();
    assert!(
        !sockets_required(),
        "{caller}: cannot bind a loopback socket ({error}) and {REQUIRE_SOCKETS_ENV} is set"
    );
    eprintln!("{caller}: cannot bind a loopback socket ({error}); skipping");
    true
}

/// Starts a wiremock server, or `None` when loopback is unavailable.
pub async fn start_mock_server() -> Option<MockServer> {
    if loopback_unavailable() {
        return None;
    }
    Some(MockServer::start().await)
}
