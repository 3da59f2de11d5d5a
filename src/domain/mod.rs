//! Domain layer: catalog records, identifiers, and the notification bus.
//!
//! Events and participants are plain serializable records. The invariants
//! that tie them together (capacity, duplicate registration, the
//! `registered` counter) are enforced by [`crate::service`].

pub mod catalog_event;
pub mod event;
pub mod event_bus;
pub mod event_date;
pub mod ids;
pub mod participant;
pub mod validation;

pub use catalog_event::CatalogEvent;
pub use event::{Event, EventPatch, NewEvent};
pub use event_bus::EventBus;
pub use ids::{EventId, ParticipantId};
pub use participant::{NewParticipant, Participant};
