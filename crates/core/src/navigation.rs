//! Navigation port used to send the user back to the login entry point

use std::sync::{Mutex, PoisonError};

/// Front-end routing as seen by the gateway
pub trait Navigator: Send + Sync {
    /// Location the user is currently on
    fn current_location(&self) -> String;

    /// Move the user to `location`
    fn navigate_to(&self, location: &str);
}

/// Navigator that only records where it was sent.
///
/// Useful for tests and for front ends that poll for redirects.
#[derive(Debug)]
pub struct RecordingNavigator {
    state: Mutex<NavigationState>,
}

#[derive(Debug)]
struct NavigationState {
    current: String,
    history: Vec<String>,
}

impl RecordingNavigator {
    /// Create a navigator positioned at `location`
    pub fn at(location: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(NavigationState {
                current: location.into(),
                history: Vec::new(),
            }),
        }
    }

    /// Every location navigated to, oldest first
    pub fn history(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .history
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_location(&self) -> String {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .clone()
    }

    fn navigate_to(&self, location: &str) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.current = location.to_string();
        state.history.push(location.to_string());
    }
}
