//! Gate in front of locations that need a session

use crate::config::AuthConfig;
use crate::session::SessionStore;
use tracing::{debug, warn};

const RETURN_TO_KEY: &str = "return_to";

/// Result of checking a location against the guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// A session exists; render the requested location
    Allow,
    /// No session; go to `to` and come back to `return_to` after login
    Redirect { to: String, return_to: String },
}

/// Route guard backed by the session store.
///
/// The requested location is kept in the same storage as the token so the
/// post-login return survives a restart of the front end.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: SessionStore,
}

impl RouteGuard {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    /// Check whether `requested` may be shown
    pub fn check(&self, requested: &str) -> GuardOutcome {
        if self.session.has_active_session() {
            return GuardOutcome::Allow;
        }

        if requested != AuthConfig::LOGIN_LOCATION
            && let Err(e) = self.session.storage().set(RETURN_TO_KEY, requested)
        {
            warn!("Failed to remember return location: {e}");
        }

        debug!(requested, "No session, redirecting to login");
        GuardOutcome::Redirect {
            to: AuthConfig::LOGIN_LOCATION.to_string(),
            return_to: requested.to_string(),
        }
    }

    /// Consume the location to show after a successful login.
    ///
    /// Falls back to the dashboard when nothing was recorded.
    pub fn take_return_target(&self) -> String {
        let storage = self.session.storage();
        let target = storage.get(RETURN_TO_KEY).unwrap_or_else(|e| {
            warn!("Failed to read return location: {e}");
            None
        });
        if target.is_some()
            && let Err(e) = storage.remove(RETURN_TO_KEY)
        {
            warn!("Failed to forget return location: {e}");
        }
        target.unwrap_or_else(|| AuthConfig::DASHBOARD_LOCATION.to_string())
    }
}
