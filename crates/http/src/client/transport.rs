//! HTTP transport backed by reqwest

use super::error::TransportError;
use super::{ResponseBody, Transport, TransportRequest, TransportResponse};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, header};
use std::time::Duration;
use tracing::warn;

const DEFAULT_USER_AGENT: &str = concat!("harbor-client/", env!("CARGO_PKG_VERSION"));

/// Transport sending requests to a fixed backend origin
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Create a new transport with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new transport builder
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.client.request(request.method, url);

        if let Some(token) = &request.bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        // The status arrived, so a broken body must not hide it
        let body = match response.bytes().await {
            Ok(bytes) => ResponseBody::from_bytes(&bytes),
            Err(e) => {
                warn!(status, "Failed to read response body: {e}");
                ResponseBody::Empty
            }
        };

        Ok(TransportResponse::new(status, body))
    }
}

/// Builder for [`ReqwestTransport`]
#[derive(Default)]
pub struct ReqwestTransportBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ReqwestTransportBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the transport
    pub fn build(self) -> Result<ReqwestTransport, TransportError> {
        let base_url = self
            .base_url
            .ok_or_else(|| TransportError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(TransportError::Configuration(
                "base_url cannot be empty".into(),
            ));
        }

        let mut client_builder = ClientBuilder::new()
            .user_agent(self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT));

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder.build()?;

        Ok(ReqwestTransport { client, base_url })
    }
}
