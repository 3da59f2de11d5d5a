//! Participant records: one registration of a person for one event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{is_valid_email, is_valid_phone, require_text};
use super::{EventId, ParticipantId};
use crate::error::AppError;

/// A registration linking a person to one [`super::Event`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Unique participant identifier.
    pub id: ParticipantId,
    /// Full name.
    pub name: String,
    /// Contact email. Unique per event.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Year of study or similar cohort label.
    pub year: String,
    /// The event this registration belongs to.
    pub event_id: EventId,
    /// When the registration was accepted.
    pub registration_date: DateTime<Utc>,
}

impl Participant {
    /// Builds a participant record from validated input, stamping a fresh
    /// id and the current time.
    #[must_use]
    pub fn create(input: NewParticipant) -> Self {
        Self {
            id: ParticipantId::new(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            year: input.year,
            event_id: input.event_id,
            registration_date: Utc::now(),
        }
    }

    /// Returns `true` if this registration is for `event_id` under `email`.
    /// Emails compare ASCII case-insensitively.
    #[must_use]
    pub fn matches(&self, event_id: &EventId, email: &str) -> bool {
        self.event_id == *event_id && self.email.eq_ignore_ascii_case(email)
    }
}

/// Registration request as accepted by the service.
#[derive(Debug, Clone)]
pub struct NewParticipant {
    /// Target event.
    pub event_id: EventId,
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Year of study or cohort label.
    pub year: String,
}

impl NewParticipant {
    /// Trims every field, rejects blanks, and checks email and phone shape.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] describing the first offending field.
    pub fn normalized(self) -> Result<Self, AppError> {
        let event_id = require_text("eventId", self.event_id.as_str())?;
        let name = require_text("name", &self.name)?;
        let email = require_text("email", &self.email)?;
        let phone = require_text("phone", &self.phone)?;
        let year = require_text("year", &self.year)?;

        if !is_valid_email(&email) {
            return Err(AppError::Validation(
                "Please enter a valid email address".to_string(),
            ));
        }
        if !is_valid_phone(&phone) {
            return Err(AppError::Validation(
                "Please enter a valid phone number".to_string(),
            ));
        }

        Ok(Self {
            event_id: EventId::from(event_id),
            name,
            email,
            phone,
            year,
        })
    }
}
