//! Correlation identifiers tying a sanitized user-facing error back to the
//! detailed log line written when it happened.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlation ID for matching an opaque error reference to its log entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Generate a new random correlation ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CorrelationId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<&str> for CorrelationId {
    fn from(id: &str) -> Self {
        Uuid::try_parse(id).map_or_else(|_| Self(Uuid::new_v4()), Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_existing_uuid() {
        let raw = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        assert_eq!(CorrelationId::from(raw).to_string(), raw);
    }

    #[test]
    fn test_invalid_input_generates_fresh_id() {
        let id = CorrelationId::from("not-a-uuid");
        assert_ne!(id.to_string(), "not-a-uuid");
    }
}
