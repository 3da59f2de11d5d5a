//! Event CRUD handlers: list, create, update, delete.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{CreateEventRequest, MessageResponse, UpdateEventRequest};
use crate::app_state::AppState;
use crate::domain::{Event, EventId};
use crate::error::{AppError, ErrorResponse};

/// `GET /api/events` — List all events.
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    summary = "List events",
    description = "Returns every event with its current registration count.",
    responses(
        (status = 200, description = "All events", body = Vec<Event>),
    )
)]
pub async fn list_events(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.registration_service.list_events().await)
}

/// `POST /api/events` — Create an event.
///
/// # Errors
///
/// Returns [`AppError::Validation`] on a missing or invalid field, or
/// [`AppError::Storage`] if the event cannot be saved.
#[utoipa::path(
    post,
    path = "/api/events",
    tag = "Events",
    summary = "Create an event",
    description = "Creates an event with no registrations. The date must be in the future and the capacity at least 1.",
    request_body = CreateEventRequest,
    responses(
        (status = 200, description = "Event created", body = Event),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<Json<Event>, AppError> {
    let Json(req) = payload?;
    let input = req.into_new_event(Utc::now())?;
    let event = state.registration_service.create_event(input).await?;
    Ok(Json(event))
}

/// `PUT /api/events/:id` — Update descriptive fields of an event.
///
/// # Errors
///
/// Returns [`AppError::EventNotFound`] if the event does not exist,
/// [`AppError::Validation`] if the patch is rejected, or
/// [`AppError::Storage`] on storage failure.
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    tag = "Events",
    summary = "Update an event",
    description = "Merges the supplied fields into the event. `registered` cannot be changed here, and capacity cannot drop below the current registrations.",
    params(
        ("id" = String, Path, description = "Event id"),
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Updated event", body = Event),
        (status = 400, description = "Invalid patch", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateEventRequest>, JsonRejection>,
) -> Result<Json<Event>, AppError> {
    let Json(req) = payload?;
    let patch = req.into_patch()?;
    let event = state
        .registration_service
        .update_event(&EventId::from(id), patch)
        .await?;
    Ok(Json(event))
}

/// `DELETE /api/events/:id` — Delete an event and its participants.
///
/// # Errors
///
/// Returns [`AppError::EventNotFound`] if the event does not exist, or
/// [`AppError::Storage`] on storage failure.
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = "Events",
    summary = "Delete an event",
    description = "Removes the event and every participant registered for it.",
    params(
        ("id" = String, Path, description = "Event id"),
    ),
    responses(
        (status = 200, description = "Event deleted", body = MessageResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let removed = state
        .registration_service
        .delete_event(&EventId::from(id))
        .await?;
    Ok(Json(MessageResponse {
        message: "Event deleted successfully".to_string(),
        participants_removed: Some(removed),
    }))
}

/// Event management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/{id}", put(update_event).delete(delete_event))
}
