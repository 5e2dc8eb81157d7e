//! Session store holding the single bearer token
//!
//! The store has no notion of expiry. A token is considered live until the
//! backend rejects it, at which point the gateway clears it.

use crate::config::AuthConfig;
use crate::error::CoreResult;
use crate::storage::{MemoryStorage, TokenStorage};
use std::sync::Arc;
use tracing::{debug, warn};

/// Handle to the process-wide session slot.
///
/// Cloning is cheap; every clone reads and writes the same storage.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn TokenStorage>,
}

impl SessionStore {
    /// Create a session store over the given storage
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        Self { storage }
    }

    /// Create a session store that lives only in memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Persist `token`, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written
    pub fn set_session(&self, token: &str) -> CoreResult<()> {
        self.storage.set(AuthConfig::TOKEN_KEY, token)?;
        debug!("Session stored");
        Ok(())
    }

    /// Remove the token. Clearing an absent session is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written
    pub fn clear_session(&self) -> CoreResult<()> {
        self.storage.remove(AuthConfig::TOKEN_KEY)?;
        debug!("Session cleared");
        Ok(())
    }

    /// Whether a token is currently persisted
    pub fn has_active_session(&self) -> bool {
        self.token().is_some()
    }

    /// Current token, if any.
    ///
    /// An unreadable storage is treated as "no session".
    pub fn token(&self) -> Option<String> {
        match self.storage.get(AuthConfig::TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                warn!("Failed to read session token: {e}");
                None
            }
        }
    }

    pub(crate) fn storage(&self) -> &dyn TokenStorage {
        self.storage.as_ref()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("active", &self.has_active_session())
            .finish()
    }
}
