//! Application error types with HTTP status code mapping.
//!
//! [`AppError`] is the central error type. Domain failures are detected by
//! the registration service before anything is persisted; storage failures
//! come from the [`crate::persistence`] layer and are reported to clients
//! as a generic failure while the cause is logged.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{EventId, ParticipantId};
use crate::persistence::StorageError;

/// JSON error response body.
///
/// ```json
/// { "error": "Event is fully booked", "code": 1003 }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Numeric error code.
    pub code: u32,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category          | HTTP Status               |
/// |-----------|-------------------|---------------------------|
/// | 1000–1999 | Rejected request  | 400 Bad Request           |
/// | 2000–2999 | Not found         | 404 Not Found             |
/// | 3000–3999 | Server            | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// A registration referenced an event that does not exist.
    #[error("Event not found")]
    UnknownEvent(EventId),

    /// The event has no remaining capacity.
    #[error("Event is fully booked")]
    CapacityExceeded(EventId),

    /// The email is already registered for the event.
    #[error("You are already registered for this event")]
    DuplicateRegistration {
        /// Target event.
        event_id: EventId,
        /// Email that is already registered.
        email: String,
    },

    /// No event with the given id.
    #[error("Event not found")]
    EventNotFound(EventId),

    /// No participant with the given id.
    #[error("Participant not found")]
    ParticipantNotFound(ParticipantId),

    /// The catalog store failed to read or write.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A catalog task ended without producing a result.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::UnknownEvent(_) => 1002,
            Self::CapacityExceeded(_) => 1003,
            Self::DuplicateRegistration { .. } => 1004,
            Self::EventNotFound(_) => 2001,
            Self::ParticipantNotFound(_) => 2002,
            Self::Internal(_) => 3000,
            Self::Storage(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::UnknownEvent(_)
            | Self::CapacityExceeded(_)
            | Self::DuplicateRegistration { .. } => StatusCode::BAD_REQUEST,
            Self::EventNotFound(_) | Self::ParticipantNotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to clients. Server-side failures are not described.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Storage(_) | Self::Internal(_) => "operation failed".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        }
        let body = ErrorResponse {
            error: self.public_message(),
            code: self.error_code(),
        };
        (status, axum::Json(body)).into_response()
    }
}
