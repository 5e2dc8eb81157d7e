//! Terminal rendition of front-end navigation
//!
//! Each command maps to a location. Being sent to the login location means
//! the session is gone, so the user is told how to get it back.

use harbor_core::{AuthConfig, Navigator};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

pub struct TerminalNavigator {
    current: Mutex<String>,
}

impl TerminalNavigator {
    pub fn at(location: impl Into<String>) -> Self {
        Self {
            current: Mutex::new(location.into()),
        }
    }
}

impl Navigator for TerminalNavigator {
    fn current_location(&self) -> String {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn navigate_to(&self, location: &str) {
        debug!(location, "Navigating");
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = location.to_string();

        if location == AuthConfig::LOGIN_LOCATION {
            eprintln!("Your session has ended. Run `harbor login` to reconnect.");
        }
    }
}

/// Command line that shows `location`
pub fn command_for(location: &str) -> String {
    match location.strip_prefix("/boats/") {
        Some(id) if !id.is_empty() => format!("harbor boats get {id}"),
        _ if location == AuthConfig::LOGIN_LOCATION => "harbor login".to_string(),
        _ => "harbor boats list".to_string(),
    }
}
