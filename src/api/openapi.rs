//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use crate::api::dto::{
    CreateEventRequest, HealthResponse, MessageResponse, RegisterParticipantRequest,
    UpdateEventRequest,
};
use crate::api::handlers::{events, participants, system};
use crate::domain::{Event, EventId, Participant, ParticipantId};
use crate::error::ErrorResponse;

/// Generated OpenAPI document, served at `/api-docs/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "eventdesk",
        description = "Event listings and participant registration with capacity enforcement."
    ),
    paths(
        events::list_events,
        events::create_event,
        events::update_event,
        events::delete_event,
        participants::list_participants,
        participants::list_event_participants,
        participants::register_participant,
        participants::delete_participant,
        system::health_handler,
    ),
    components(schemas(
        Event,
        EventId,
        Participant,
        ParticipantId,
        CreateEventRequest,
        UpdateEventRequest,
        RegisterParticipantRequest,
        MessageResponse,
        HealthResponse,
        ErrorResponse,
    )),
    tags(
        (name = "Events", description = "Event management"),
        (name = "Participants", description = "Registrations"),
        (name = "System", description = "Service status"),
    )
)]
pub struct ApiDoc;
