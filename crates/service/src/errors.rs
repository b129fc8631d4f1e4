use serde_json::Value;
use thiserror::Error;

use crate::auth::errors::AuthError;

/// Shown when neither the server nor the error itself says anything useful.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Failures of a single HTTP exchange (or an exhausted fallback chain).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request timed out.")]
    Timeout,
    #[error("Unable to reach the server: {0}")]
    Network(String),
    #[error("Request failed with status code {status}")]
    Status { status: u16, body: Option<Value> },
    #[error("No API endpoint was available.")]
    NoEndpointAvailable { tried: Vec<String> },
    #[error("Unexpected response from server: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// No HTTP response arrived at all.
    pub fn is_network_unavailable(&self) -> bool {
        matches!(self, ApiError::Timeout | ApiError::Network(_))
    }

    /// Single human-readable message: server `detail`, then `message`, then
    /// this error's own description (generic text for bare status failures).
    pub fn user_message(&self) -> String {
        if let Some(body) = self.body() {
            if let Some(detail) = body.get("detail").and_then(text_of) {
                return detail;
            }
            if let Some(message) = body.get("message").and_then(text_of) {
                return message;
            }
        }
        match self {
            ApiError::Status { .. } => GENERIC_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Flatten a `detail`/`message` value. Validation errors often arrive as a
/// list of `{ msg }` objects.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(obj) => obj.get("msg").and_then(text_of),
                    other => text_of(other),
                })
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("storage error: {0}")]
    Storage(String),
    #[error(transparent)]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self { Self::Validation(msg.into()) }

    pub fn not_found(entity: &str) -> Self { Self::Validation(format!("{} not found.", entity)) }

    /// The message a user should see for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}
