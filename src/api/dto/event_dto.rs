//! Event DTOs for create and update requests.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::IgnoredAny;
use utoipa::ToSchema;

use crate::domain::event::DEFAULT_CATEGORY;
use crate::domain::{EventPatch, NewEvent, event_date};
use crate::error::AppError;

/// Request body for `POST /api/events`.
///
/// `id`, `registered` and `image` are assigned by the server; they are
/// accepted so that clients can post a whole event object, and ignored.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateEventRequest {
    /// Short title.
    pub title: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Event date: RFC 3339, `YYYY-MM-DDTHH:MM`, or `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Venue.
    pub location: Option<String>,
    /// Maximum participants (at least 1).
    pub capacity: Option<u32>,
    /// Category label. Defaults to `Workshop`.
    pub category: Option<String>,
    #[serde(rename = "id")]
    #[schema(ignore)]
    _id: Option<IgnoredAny>,
    #[serde(rename = "registered")]
    #[schema(ignore)]
    _registered: Option<IgnoredAny>,
    #[serde(rename = "image")]
    #[schema(ignore)]
    _image: Option<IgnoredAny>,
}

impl CreateEventRequest {
    /// Checks presence and policy of every field and converts the request
    /// into a [`NewEvent`].
    ///
    /// `now` is the reference point for the future-date rule.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a required field is missing, the
    /// date cannot be parsed or is not in the future, or the capacity is
    /// zero.
    pub fn into_new_event(self, now: DateTime<Utc>) -> Result<NewEvent, AppError> {
        let title = required(self.title, "title")?;
        let description = required(self.description, "description")?;
        let raw_date = required(self.date, "date")?;
        let location = required(self.location, "location")?;
        let capacity = self
            .capacity
            .ok_or_else(|| AppError::Validation("capacity is required".to_string()))?;

        let date = parse_date(&raw_date)?;
        if date <= now {
            return Err(AppError::Validation(
                "Event date must be in the future".to_string(),
            ));
        }
        check_capacity(capacity)?;

        Ok(NewEvent {
            title,
            description,
            date,
            location,
            capacity,
            category: self
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        })
    }
}

/// Request body for `PUT /api/events/:id`.
///
/// Every field is optional; absent fields are left unchanged. Server-owned
/// fields (`id`, `registered`, `image`) are accepted and ignored.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateEventRequest {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New date.
    pub date: Option<String>,
    /// New venue.
    pub location: Option<String>,
    /// New capacity (at least 1).
    pub capacity: Option<u32>,
    /// New category.
    pub category: Option<String>,
    #[serde(rename = "id")]
    #[schema(ignore)]
    _id: Option<IgnoredAny>,
    #[serde(rename = "registered")]
    #[schema(ignore)]
    _registered: Option<IgnoredAny>,
    #[serde(rename = "image")]
    #[schema(ignore)]
    _image: Option<IgnoredAny>,
}

impl UpdateEventRequest {
    /// Converts the request into a typed [`EventPatch`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the date cannot be parsed or the
    /// capacity is zero.
    pub fn into_patch(self) -> Result<EventPatch, AppError> {
        let date = self.date.as_deref().map(parse_date).transpose()?;
        if let Some(capacity) = self.capacity {
            check_capacity(capacity)?;
        }
        Ok(EventPatch {
            title: self.title,
            description: self.description,
            date,
            location: self.location,
            capacity: self.capacity,
            category: self.category,
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value.ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, AppError> {
    event_date::parse(raw).ok_or_else(|| AppError::Validation(format!("invalid date: {raw}")))
}

fn check_capacity(capacity: u32) -> Result<(), AppError> {
    if capacity < 1 {
        return Err(AppError::Validation(
            "Capacity must be at least 1".to_string(),
        ));
    }
    Ok(())
}
