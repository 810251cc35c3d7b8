//! Error types for the pipe API client

use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Classification of a non-2xx response by status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    BadRequest,
    Authentication,
    PermissionDenied,
    NotFound,
    Conflict,
    UnprocessableEntity,
    RateLimit,
    InternalServer,
    Other,
}

impl ApiErrorKind {
    pub const fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Authentication,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            409 => Self::Conflict,
            422 => Self::UnprocessableEntity,
            429 => Self::RateLimit,
            500.. => Self::InternalServer,
            _ => Self::Other,
        }
    }
}

/// A non-2xx response from the API
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: u16,
    pub status_text: String,
    pub headers: HashMap<String, String>,
    /// Parsed JSON body, or the raw text as a JSON string
    pub body: Value,
    pub kind: ApiErrorKind,
}

impl ApiError {
    pub fn new(
        status: u16,
        status_text: impl Into<String>,
        headers: HashMap<String, String>,
        body: Value,
    ) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            headers,
            body,
            kind: ApiErrorKind::from_status(status),
        }
    }

    /// Best human-readable message carried by the body
    pub fn message(&self) -> String {
        let nested = self
            .body
            .get("error")
            .and_then(|error| error.get("message").or(Some(error)));
        let candidate = nested.or_else(|| self.body.get("message"));

        match candidate.unwrap_or(&self.body) {
            Value::String(text) if !text.is_empty() => text.clone(),
            Value::Null | Value::String(_) => {
                format!("{} status code (no body)", self.status_text)
            }
            other => other.to_string(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status, self.message())
    }
}

/// Pipe API client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or no response arrived
    #[error("Connection error: {message}")]
    Connection { message: String },

    /// The API answered with a non-2xx status
    #[error("API error: {0}")]
    Api(ApiError),

    /// A response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// The request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// The API error, if this is one
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(error) => Some(error),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else if e.is_builder() {
            Self::InvalidRequest(e.to_string())
        } else if e.is_timeout() {
            Self::connection(format!("Request timed out: {e}"))
        } else {
            Self::connection(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
