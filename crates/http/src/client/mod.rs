//! Transport abstraction and API clients

pub mod auth;
pub mod boats;
pub mod error;
pub mod gateway;
pub mod transport;

use async_trait::async_trait;
use error::TransportError;
use reqwest::Method;
use serde_json::Value;

/// One outbound call as handed to a [`Transport`]
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    /// Path relative to the backend origin, starting with `/`
    pub path: String,
    /// Token to send as `Authorization: Bearer <token>`
    pub bearer: Option<String>,
    /// JSON body
    pub body: Option<Value>,
}

/// Parsed response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// No content
    Empty,
    /// Body that parsed as JSON
    Json(Value),
    /// Body that is not JSON
    Text(String),
}

impl ResponseBody {
    /// Parse raw bytes, preferring JSON
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Self::Empty;
        }
        serde_json::from_slice(bytes).map_or_else(
            |_| Self::Text(String::from_utf8_lossy(bytes).into_owned()),
            Self::Json,
        )
    }

    /// Payload handed back to callers on success
    pub fn into_payload(self) -> Option<Value> {
        match self {
            Self::Empty => None,
            Self::Json(value) => Some(value),
            Self::Text(text) => Some(Value::String(text)),
        }
    }
}

/// A response that was received, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl TransportResponse {
    pub const fn new(status: u16, body: ResponseBody) -> Self {
        Self { status, body }
    }

    pub const fn json(status: u16, value: Value) -> Self {
        Self::new(status, ResponseBody::Json(value))
    }

    pub fn text(status: u16, text: impl Into<String>) -> Self {
        Self::new(status, ResponseBody::Text(text.into()))
    }

    pub const fn empty(status: u16) -> Self {
        Self::new(status, ResponseBody::Empty)
    }

    /// Whether the status is 2xx
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Wire used by the gateway.
///
/// `Ok` means a response arrived, even with an error status. `Err` means
/// none did.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
