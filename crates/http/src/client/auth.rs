//! Authentication API service

use super::gateway::Gateway;
use harbor_core::{ApiError, CoreResult, LoginRequest, LoginResponse};
use reqwest::Method;
use tracing::{info, warn};

/// Login and logout on top of the gateway
#[derive(Clone, Debug)]
pub struct AuthService {
    gateway: Gateway,
}

impl AuthService {
    pub const fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Exchange credentials for a token and store it as the session
    ///
    /// # Errors
    ///
    /// Returns the gateway's [`ApiError`] when the backend refuses the
    /// credentials, or the unknown error when the token cannot be stored.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<String, ApiError> {
        let response: LoginResponse = self
            .gateway
            .send_json(Method::POST, self.gateway.login_path(), Some(credentials))
            .await?;

        self.gateway
            .session()
            .set_session(&response.token)
            .map_err(|e| {
                warn!("Failed to store session: {e}");
                ApiError::unknown()
            })?;

        info!(username = %credentials.username, "Logged in");
        Ok(response.token)
    }

    /// Forget the session locally; the backend is not contacted
    ///
    /// # Errors
    ///
    /// Returns an error if the session storage cannot be written
    pub fn logout(&self) -> CoreResult<()> {
        self.gateway.session().clear_session()?;
        info!("Logged out");
        Ok(())
    }

    /// Whether a session token is stored
    pub fn is_authenticated(&self) -> bool {
        self.gateway.session().has_active_session()
    }
}
