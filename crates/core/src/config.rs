//! Session and routing constants

use std::time::Duration;

/// Authentication configuration
pub struct AuthConfig;

impl AuthConfig {
    /// Storage key holding the bearer token
    pub const TOKEN_KEY: &'static str = "token";

    /// Backend endpoint that exchanges credentials for a token
    pub const LOGIN_ENDPOINT: &'static str = "/auth/login";

    /// Front-end location of the login entry point
    pub const LOGIN_LOCATION: &'static str = "/login";

    /// Front-end location of the gated dashboard
    pub const DASHBOARD_LOCATION: &'static str = "/boats";

    /// Liveness re-check interval in seconds
    pub const SESSION_CHECK_INTERVAL_SECS: u64 = 300; // 5 minutes

    /// Liveness re-check interval
    pub const fn session_check_interval() -> Duration {
        Duration::from_secs(Self::SESSION_CHECK_INTERVAL_SECS)
    }
}
