//! Participant registration DTOs.

use serde::Deserialize;
use serde::de::IgnoredAny;
use utoipa::ToSchema;

use crate::domain::{EventId, NewParticipant};

/// Request body for `POST /api/participants`.
///
/// Missing fields deserialize as empty strings and are rejected by the
/// registration service with a field-specific message.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterParticipantRequest {
    /// Event to register for.
    #[serde(default)]
    pub event_id: String,
    /// Full name.
    #[serde(default)]
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone: String,
    /// Year of study or cohort label.
    #[serde(default)]
    pub year: String,
    #[serde(rename = "id")]
    #[schema(ignore)]
    _id: Option<IgnoredAny>,
    #[serde(rename = "registrationDate")]
    #[schema(ignore)]
    _registration_date: Option<IgnoredAny>,
}

impl From<RegisterParticipantRequest> for NewParticipant {
    fn from(req: RegisterParticipantRequest) -> Self {
        Self {
            event_id: EventId::from(req.event_id),
            name: req.name,
            email: req.email,
            phone: req.phone,
            year: req.year,
        }
    }
}
