//! Transport errors and failure classification

use super::ResponseBody;
use harbor_core::{ApiError, FieldErrors};
use serde_json::Value;
use thiserror::Error;

/// Failure to get any response from the backend
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

/// Turn an error response into the uniform error.
///
/// Rules are checked in order and the first match wins:
///
/// 1. 401: credentials rejected on the login call, otherwise session expired
/// 2. 403: insufficient permissions
/// 3. 400 with a JSON object body: the body is the field-error map
/// 4. plain string body: used as the message
/// 5. JSON object with a `message` field: that field is the message
/// 6. anything else: the generic unknown-error message
pub fn classify_response(status: u16, body: &ResponseBody, login_request: bool) -> ApiError {
    match (status, body) {
        (401, _) if login_request => ApiError::from_response(status, ApiError::INCORRECT_CREDENTIALS),
        (401, _) => ApiError::from_response(status, ApiError::SESSION_EXPIRED),
        (403, _) => ApiError::from_response(status, ApiError::INSUFFICIENT_PERMISSIONS),
        (400, ResponseBody::Json(Value::Object(fields))) => ApiError::validation(
            fields
                .iter()
                .map(|(field, message)| (field.clone(), value_to_message(message)))
                .collect::<FieldErrors>(),
        ),
        (_, ResponseBody::Text(text)) => ApiError::from_response(status, text.clone()),
        (_, ResponseBody::Json(Value::String(text))) => {
            ApiError::from_response(status, text.clone())
        }
        (_, ResponseBody::Json(Value::Object(fields))) => fields.get("message").map_or_else(
            || ApiError::from_response(status, ApiError::UNKNOWN_ERROR),
            |message| ApiError::from_response(status, value_to_message(message)),
        ),
        _ => ApiError::from_response(status, ApiError::UNKNOWN_ERROR),
    }
}

fn value_to_message(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
