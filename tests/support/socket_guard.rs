//! Skips wiremock-backed tests where localhost sockets are unavailable.

use std::net::TcpListener;

use wiremock::MockServer;

/// Set to `1`, `true` or `yes` to turn a skip into a failure (CI).
const REQUIRE_ENV: &str = "SUBGRAB_REQUIRE_SOCKET_TESTS";

fn sockets_required() -> bool {
    std::env::var(REQUIRE_ENV)
        .is_ok_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

/// Starts a mock SubHD, or returns `None` when this sandbox cannot bind
/// `127.0.0.1`.
pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if TcpListener::bind("127.0.0.1:0").is_ok() {
        return Some(MockServer::start().await);
    }

    let message = "cannot bind a localhost socket for the mock SubHD";
    assert!(!sockets_required(), "{message}; unset {REQUIRE_ENV} to skip instead");
    eprintln!("{message}; skipping. Set {REQUIRE_ENV}=1 to fail instead.");
    None
}
