//! Request gateway: the single path to the backend

use super::error::classify_response;
use super::{Transport, TransportRequest};
use harbor_core::{ApiError, AuthConfig, Navigator, SessionStore};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Sends requests with the session token and normalizes every failure.
///
/// When the backend answers 401 or 403 to anything but the login call, the
/// session is cleared and the navigator is sent to the login location before
/// the error is returned. Callers cannot opt out of this.
#[derive(Clone)]
pub struct Gateway {
    transport: Arc<dyn Transport>,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
    login_path: String,
}

impl Gateway {
    pub fn new(
        transport: Arc<dyn Transport>,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            transport,
            session,
            navigator,
            login_path: AuthConfig::LOGIN_ENDPOINT.to_string(),
        }
    }

    /// Override the backend login endpoint
    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Session store the gateway reads the token from
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Backend login endpoint
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Send one request.
    ///
    /// Returns the parsed payload of a 2xx response unchanged, or `None` when
    /// the response had no body.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for any non-2xx response or when no
    /// response was received.
    pub async fn perform_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Option<Value>, ApiError> {
        let bearer = self.session.token();
        debug!(%method, path, authenticated = bearer.is_some(), "Sending request");

        let request = TransportRequest {
            method: method.clone(),
            path: path.to_string(),
            bearer,
            body,
        };

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%method, path, "No response from backend: {e}");
                return Err(ApiError::transport());
            }
        };

        if response.is_success() {
            debug!(%method, path, status = response.status, "Request succeeded");
            return Ok(response.body.into_payload());
        }

        let login_request = self.is_login_request(path);
        let error = classify_response(response.status, &response.body, login_request);
        debug!(%method, path, status = error.status(), kind = ?error.kind(), "Request failed");

        if error.is_auth_rejected() && !login_request {
            self.end_session();
        }

        Err(error)
    }

    /// Send a request with a serializable body and decode the payload
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] on failure, or the unknown error
    /// when the body cannot be encoded or the payload cannot be decoded.
    pub async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = body.map(encode).transpose()?;
        let payload = self.perform_request(method, path, body).await?;
        decode(path, payload)
    }

    fn is_login_request(&self, path: &str) -> bool {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        path == self.login_path
    }

    fn end_session(&self) {
        warn!("Backend rejected the session, signing out");
        if let Err(e) = self.session.clear_session() {
            warn!("Failed to clear session: {e}");
        }

        let current = self.navigator.current_location();
        let current = current.split(['?', '#']).next().unwrap_or_default();
        if current != AuthConfig::LOGIN_LOCATION {
            self.navigator.navigate_to(AuthConfig::LOGIN_LOCATION);
        }
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("session", &self.session)
            .field("login_path", &self.login_path)
            .finish_non_exhaustive()
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| {
        warn!("Failed to encode request body: {e}");
        ApiError::unknown()
    })
}

fn decode<T: DeserializeOwned>(path: &str, payload: Option<Value>) -> Result<T, ApiError> {
    serde_json::from_value(payload.unwrap_or(Value::Null)).map_err(|e| {
        warn!(path, "Unexpected response payload: {e}");
        ApiError::unknown()
    })
}
