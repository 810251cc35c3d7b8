//! Error sanitization for contract boundaries
//!
//! The detailed cause is logged together with a correlation id; the caller
//! only receives a stable message and the reference.

use crate::correlation::CorrelationId;
use tracing::error;

/// A sanitized failure: the correlation id that was logged and the message
/// safe to hand to a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedError {
    pub correlation_id: CorrelationId,
    pub message: String,
}

impl std::fmt::Display for SanitizedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Log the detailed error and return a generic message
pub fn sanitize_error<E: std::fmt::Display>(error: E, context: &str) -> SanitizedError {
    sanitize_with_message(error, context, "Operation failed")
}

/// Log the detailed error and return `user_message` with a correlation ref
pub fn sanitize_with_message<E: std::fmt::Display>(
    error: E,
    context: &str,
    user_message: &str,
) -> SanitizedError {
    let correlation_id = CorrelationId::new();
    error!(
        correlation_id = %correlation_id,
        error = %error,
        context = %context,
        "Internal error occurred"
    );

    let message = format!("{user_message} (ref: {correlation_id})");
    SanitizedError {
        correlation_id,
        message,
    }
}
