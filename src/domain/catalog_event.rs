//! Notifications emitted after catalog mutations.
//!
//! Every successful write in the registration service publishes a
//! [`CatalogEvent`] through the [`super::EventBus`]. WebSocket clients
//! subscribe to these to keep capacity displays current.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Event, EventId, ParticipantId};

/// Catalog change notification.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum CatalogEvent {
    /// A new event was published.
    EventCreated {
        /// The created event.
        event: Event,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Descriptive fields of an event changed.
    EventUpdated {
        /// The event after the update.
        event: Event,
        /// Update timestamp.
        timestamp: DateTime<Utc>,
    },

    /// An event and its participants were removed.
    EventDeleted {
        /// Identifier of the removed event.
        event_id: EventId,
        /// Number of participants removed with it.
        participants_removed: usize,
        /// Removal timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A participant registered for an event.
    ParticipantRegistered {
        /// Target event.
        event_id: EventId,
        /// New participant.
        participant_id: ParticipantId,
        /// Registered count after the registration.
        registered: u32,
        /// Event capacity.
        capacity: u32,
        /// Registration timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A participant was removed from an event.
    ParticipantRemoved {
        /// Event the participant belonged to.
        event_id: EventId,
        /// Removed participant.
        participant_id: ParticipantId,
        /// Registered count after the removal.
        registered: u32,
        /// Removal timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl CatalogEvent {
    /// Returns the id of the event this notification concerns.
    #[must_use]
    pub fn event_id(&self) -> &EventId {
        match self {
            Self::EventCreated { event, .. } | Self::EventUpdated { event, .. } => &event.id,
            Self::EventDeleted { event_id, .. }
            | Self::ParticipantRegistered { event_id, .. }
            | Self::ParticipantRemoved { event_id, .. } => event_id,
        }
    }

    /// Returns the notification type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::EventCreated { .. } => "event_created",
            Self::EventUpdated { .. } => "event_updated",
            Self::EventDeleted { .. } => "event_deleted",
            Self::ParticipantRegistered { .. } => "participant_registered",
            Self::ParticipantRemoved { .. } => "participant_removed",
        }
    }
}
