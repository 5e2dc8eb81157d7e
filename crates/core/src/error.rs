//! Error types shared across crates

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from record field name to a human-readable validation message
pub type FieldErrors = BTreeMap<String, String>;

/// Standard result type for core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Core error types for session storage
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum CoreError {
    #[error("IO operation failed: {message}")]
    Io { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl CoreError {
    /// Create an IO error
    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization_error(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        Self::io_error(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization_error(err.to_string())
    }
}

/// Failure classes an [`ApiError`] can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The backend rejected the credential (401) or the action (403)
    AuthRejected,
    /// The backend refused the payload and named the offending fields
    ValidationFailed,
    /// The addressed record does not exist
    NotFound,
    /// Any other error status reported by the backend
    ServerFault,
    /// No response was received at all
    TransportFailure,
}

impl ErrorKind {
    /// Classify an HTTP status that came back with a response
    pub const fn from_status(status: u16, has_field_errors: bool) -> Self {
        match status {
            401 | 403 => Self::AuthRejected,
            400 if has_field_errors => Self::ValidationFailed,
            404 => Self::NotFound,
            _ => Self::ServerFault,
        }
    }
}

/// The one error shape callers of the gateway observe.
///
/// Built once per failure and never mutated; fields are only reachable
/// through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    message: String,
    status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    field_errors: Option<FieldErrors>,
    kind: ErrorKind,
}

impl ApiError {
    pub const INCORRECT_CREDENTIALS: &'static str = "incorrect credentials";
    pub const SESSION_EXPIRED: &'static str = "session expired, please reconnect";
    pub const INSUFFICIENT_PERMISSIONS: &'static str = "insufficient permissions";
    pub const VALIDATION_FAILED: &'static str = "please correct the validation errors";
    pub const UNKNOWN_ERROR: &'static str = "an unknown error occurred";

    /// Status reported when no response was received
    pub const FALLBACK_STATUS: u16 = 500;

    /// Create an error for a response that carried a status
    pub fn from_response(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
            field_errors: None,
            kind: ErrorKind::from_status(status, false),
        }
    }

    /// Create a validation error carrying per-field messages
    pub fn validation(field_errors: FieldErrors) -> Self {
        Self {
            message: Self::VALIDATION_FAILED.to_string(),
            status: 400,
            field_errors: Some(field_errors),
            kind: ErrorKind::ValidationFailed,
        }
    }

    /// Create the generic error used when nothing better is known
    pub fn unknown() -> Self {
        Self {
            message: Self::UNKNOWN_ERROR.to_string(),
            status: Self::FALLBACK_STATUS,
            field_errors: None,
            kind: ErrorKind::ServerFault,
        }
    }

    /// Create the generic error for a request that never got a response
    pub fn transport() -> Self {
        Self {
            kind: ErrorKind::TransportFailure,
            ..Self::unknown()
        }
    }

    /// User-facing message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP-derived status code
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Per-field messages, present only for validation failures
    pub const fn field_errors(&self) -> Option<&FieldErrors> {
        self.field_errors.as_ref()
    }

    /// Failure class
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Whether the backend refused the credential or the action
    pub const fn is_auth_rejected(&self) -> bool {
        matches!(self.status, 401 | 403)
    }
}
