//! Participant handlers: list, register, remove.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::{Json, Router};

use crate::api::dto::{MessageResponse, RegisterParticipantRequest};
use crate::app_state::AppState;
use crate::domain::{EventId, Participant, ParticipantId};
use crate::error::{AppError, ErrorResponse};

/// `GET /api/participants` — List all participants.
#[utoipa::path(
    get,
    path = "/api/participants",
    tag = "Participants",
    summary = "List participants",
    responses(
        (status = 200, description = "All participants", body = Vec<Participant>),
    )
)]
pub async fn list_participants(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.registration_service.list_participants(None).await)
}

/// `GET /api/participants/event/:eventId` — List participants of one event.
#[utoipa::path(
    get,
    path = "/api/participants/event/{eventId}",
    tag = "Participants",
    summary = "List participants of an event",
    description = "Returns the participants registered for the given event. Unknown events yield an empty list.",
    params(
        ("eventId" = String, Path, description = "Event id"),
    ),
    responses(
        (status = 200, description = "Participants of the event", body = Vec<Participant>),
    )
)]
pub async fn list_event_participants(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> impl IntoResponse {
    let event_id = EventId::from(event_id);
    Json(
        state
            .registration_service
            .list_participants(Some(&event_id))
            .await,
    )
}

/// `POST /api/participants` — Register for an event.
///
/// # Errors
///
/// Returns a 400 [`AppError`] when the input is invalid, the event does
/// not exist, the event is full, or the email is already registered;
/// [`AppError::Storage`] on storage failure.
#[utoipa::path(
    post,
    path = "/api/participants",
    tag = "Participants",
    summary = "Register a participant",
    description = "Registers a person for an event, enforcing the event's capacity and one registration per email.",
    request_body = RegisterParticipantRequest,
    responses(
        (status = 200, description = "Registration accepted", body = Participant),
        (status = 400, description = "Invalid input, unknown event, event full, or already registered", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn register_participant(
    State(state): State<AppState>,
    payload: Result<Json<RegisterParticipantRequest>, JsonRejection>,
) -> Result<Json<Participant>, AppError> {
    let Json(req) = payload?;
    let participant = state
        .registration_service
        .register_participant(req.into())
        .await?;
    Ok(Json(participant))
}

/// `DELETE /api/participants/:id` — Cancel a registration.
///
/// # Errors
///
/// Returns [`AppError::ParticipantNotFound`] if the participant does not
/// exist, or [`AppError::Storage`] on storage failure.
#[utoipa::path(
    delete,
    path = "/api/participants/{id}",
    tag = "Participants",
    summary = "Remove a participant",
    description = "Removes the registration and frees one place on its event.",
    params(
        ("id" = String, Path, description = "Participant id"),
    ),
    responses(
        (status = 200, description = "Participant removed", body = MessageResponse),
        (status = 404, description = "Participant not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn delete_participant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .registration_service
        .delete_participant(&ParticipantId::from(id))
        .await?;
    Ok(Json(MessageResponse::new("Participant removed successfully")))
}

/// Participant routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/participants",
            get(list_participants).post(register_participant),
        )
        .route("/participants/{id}", delete(delete_participant))
        .route(
            "/participants/event/{event_id}",
            get(list_event_participants),
        )
}
