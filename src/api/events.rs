//! Event endpoints and approval workflow

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::event::{CreateEvent, Event, EventQuery, RejectRequest, UpdateEvent},
};

use super::AuthenticatedUser;

/// List events, optionally filtered by status, creator or text
#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    params(EventQuery),
    responses(
        (status = 200, description = "Events list", body = Vec<Event>)
    )
)]
pub async fn list_events(
    State(state): State<crate::AppState>,
    Query(query): Query<EventQuery>,
) -> AppResult<Json<Vec<Event>>> {
    let events = state.services.events.list(&query).await?;
    Ok(Json(events))
}

/// Get event by ID
#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = Event),
        (status = 404, description = "Event not found")
    )
)]
pub async fn get_event(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Event>> {
    let event = state.services.events.get_by_id(id).await?;
    Ok(Json(event))
}

/// Create an event (starts PENDING)
#[utoipa::path(
    post,
    path = "/events",
    tag = "events",
    security(("bearer_auth" = [])),
    request_body = CreateEvent,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Invalid dates or capacity"),
        (status = 403, description = "Role cannot create events")
    )
)]
pub async fn create_event(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateEvent>,
) -> AppResult<(StatusCode, Json<Event>)> {
    let event = state.services.events.create(&claims, &data).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Update an event
#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Event ID")),
    request_body = UpdateEvent,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, description = "Invalid change"),
        (status = 403, description = "Not allowed to edit this event"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn update_event(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(data): Json<UpdateEvent>,
) -> AppResult<Json<Event>> {
    let event = state.services.events.update(&claims, id, &data).await?;
    Ok(Json(event))
}

/// Delete an event with its registrations
#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 403, description = "Not allowed to delete this event"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn delete_event(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.events.delete(&claims, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Approve a pending event
#[utoipa::path(
    post,
    path = "/events/{id}/approve",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event approved", body = Event),
        (status = 400, description = "Event is not pending"),
        (status = 403, description = "Reviewer role required")
    )
)]
pub async fn approve_event(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Event>> {
    let event = state.services.events.approve(&claims, id).await?;
    Ok(Json(event))
}

/// Reject a pending event with a reason
#[utoipa::path(
    post,
    path = "/events/{id}/reject",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Event ID")),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Event rejected", body = Event),
        (status = 400, description = "Event is not pending or reason missing"),
        (status = 403, description = "Reviewer role required")
    )
)]
pub async fn reject_event(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(request): Json<RejectRequest>,
) -> AppResult<Json<Event>> {
    let event = state.services.events.reject(&claims, id, &request.reason).await?;
    Ok(Json(event))
}
