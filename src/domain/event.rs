//! Event records and the inputs that create or modify them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::EventId;
use super::validation::require_text;
use crate::error::AppError;

/// Category assumed when a create request omits one.
pub const DEFAULT_CATEGORY: &str = "Workshop";

/// A schedulable activity with a maximum attendance.
///
/// `registered` is a denormalized count of the participants referencing
/// this event. It is only changed by the registration service, and
/// `registered <= capacity` holds after every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    /// Unique event identifier.
    pub id: EventId,
    /// Short title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// When the event takes place.
    #[serde(deserialize_with = "super::event_date::deserialize")]
    pub date: DateTime<Utc>,
    /// Venue.
    pub location: String,
    /// Maximum number of participants.
    pub capacity: u32,
    /// Current number of registered participants.
    #[serde(default)]
    pub registered: u32,
    /// Category label, e.g. `"Hackathon"`.
    pub category: String,
    /// Display glyph derived from the category.
    #[serde(default)]
    pub image: String,
}

impl Event {
    /// Builds a fresh event from validated input with a new id and no
    /// registrations.
    #[must_use]
    pub fn create(input: NewEvent) -> Self {
        let image = image_for_category(&input.category).to_string();
        Self {
            id: EventId::new(),
            title: input.title,
            description: input.description,
            date: input.date,
            location: input.location,
            capacity: input.capacity,
            registered: 0,
            category: input.category,
            image,
        }
    }

    /// Returns `true` when no further registrations are accepted.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.registered >= self.capacity
    }

    /// Number of places still available.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.registered)
    }

    /// Merges a patch into this event.
    ///
    /// The patch is fully checked before anything is written, so a
    /// rejected patch leaves the event untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a supplied text field is blank or
    /// the new capacity is lower than the number of registered participants.
    pub fn apply(&mut self, patch: EventPatch) -> Result<(), AppError> {
        let title = patch.title.map(|v| require_text("title", &v)).transpose()?;
        let description = patch
            .description
            .map(|v| require_text("description", &v))
            .transpose()?;
        let location = patch
            .location
            .map(|v| require_text("location", &v))
            .transpose()?;
        let category = patch
            .category
            .map(|v| require_text("category", &v))
            .transpose()?;

        if let Some(capacity) = patch.capacity
            && capacity < self.registered
        {
            return Err(AppError::Validation(format!(
                "capacity cannot be lower than the {} participants already registered",
                self.registered
            )));
        }

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(location) = location {
            self.location = location;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(capacity) = patch.capacity {
            self.capacity = capacity;
        }
        if let Some(category) = category {
            self.image = image_for_category(&category).to_string();
            self.category = category;
        }
        Ok(())
    }
}

/// Descriptive fields of an event to be created.
#[derive(Debug, Clone)]
pub struct NewEvent {
    /// Short title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// When the event takes place.
    pub date: DateTime<Utc>,
    /// Venue.
    pub location: String,
    /// Maximum number of participants.
    pub capacity: u32,
    /// Category label.
    pub category: String,
}

impl NewEvent {
    /// Trims every text field and rejects blank ones.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] naming the first blank field.
    pub fn normalized(self) -> Result<Self, AppError> {
        Ok(Self {
            title: require_text("title", &self.title)?,
            description: require_text("description", &self.description)?,
            date: self.date,
            location: require_text("location", &self.location)?,
            capacity: self.capacity,
            category: require_text("category", &self.category)?,
        })
    }
}

/// Optional descriptive fields for an event update.
///
/// Has no `registered` field; the counter is owned by the registration
/// workflow.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New date.
    pub date: Option<DateTime<Utc>>,
    /// New venue.
    pub location: Option<String>,
    /// New capacity.
    pub capacity: Option<u32>,
    /// New category; also refreshes the display glyph.
    pub category: Option<String>,
}

/// Maps a category to its display glyph.
#[must_use]
pub fn image_for_category(category: &str) -> &'static str {
    match category {
        "Workshop" => "🔧",
        "Bootcamp" => "🚀",
        "Competition" => "🏆",
        "Masterclass" => "🎓",
        "Seminar" => "📚",
        "Conference" => "🎤",
        "Hackathon" => "💻",
        "Networking" => "🤝",
        _ => "📅",
    }
}
