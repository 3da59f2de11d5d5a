//! Shared response DTOs.

use serde::Serialize;
use utoipa::ToSchema;

/// Confirmation body for successful deletions.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// Participants removed along with an event, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants_removed: Option<usize>,
}

impl MessageResponse {
    /// Creates a confirmation with only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            participants_removed: None,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"OK"` while the process is serving.
    pub status: String,
    /// Current server time (RFC 3339).
    pub timestamp: String,
    /// Crate version.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_omits_absent_count() {
        let json = serde_json::to_string(&MessageResponse::new("done")).unwrap_or_default();
        assert_eq!(json, r#"{"message":"done"}"#);
    }

    #[test]
    fn message_includes_count_in_camel_case() {
        let body = MessageResponse {
            message: "Event deleted".to_string(),
            participants_removed: Some(3),
        };
        let json = serde_json::to_string(&body).unwrap_or_default();
        assert!(json.contains("\"participantsRemoved\":3"));
    }
}
