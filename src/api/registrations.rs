//! Event registration endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::registration::{RegisterRequest, RegisteredUser, Registration, RegistrationTarget},
};

use super::{AuthenticatedUser, MessageResponse};

#[derive(Serialize, ToSchema)]
pub struct IsRegisteredResponse {
    pub registered: bool,
}

/// Register for an event (self, or another user when staff)
#[utoipa::path(
    post,
    path = "/events/{id}/register",
    tag = "registrations",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Event ID"), RegistrationTarget),
    request_body(content = Option<RegisterRequest>, description = "Optional registration notes"),
    responses(
        (status = 201, description = "Registered", body = Registration),
        (status = 400, description = "Event not approved, full, or already registered"),
        (status = 404, description = "Event or user not found")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(event_id): Path<i64>,
    Query(target): Query<RegistrationTarget>,
    body: Option<Json<RegisterRequest>>,
) -> AppResult<(StatusCode, Json<Registration>)> {
    let notes = body.and_then(|Json(b)| b.notes);
    let registration = state
        .services
        .registrations
        .register(&claims, event_id, target.user_id, notes.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

/// Cancel a registration
#[utoipa::path(
    delete,
    path = "/events/{id}/register",
    tag = "registrations",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Event ID"), RegistrationTarget),
    responses(
        (status = 200, description = "Registration cancelled", body = MessageResponse),
        (status = 404, description = "Registration not found")
    )
)]
pub async fn cancel(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(event_id): Path<i64>,
    Query(target): Query<RegistrationTarget>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .registrations
        .cancel(&claims, event_id, target.user_id)
        .await?;
    Ok(Json(MessageResponse::new("Registration cancelled successfully")))
}

/// Whether a user holds a confirmed registration
#[utoipa::path(
    get,
    path = "/events/{id}/is-registered",
    tag = "registrations",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Event ID"), RegistrationTarget),
    responses(
        (status = 200, description = "Registration state", body = IsRegisteredResponse)
    )
)]
pub async fn is_registered(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(event_id): Path<i64>,
    Query(target): Query<RegistrationTarget>,
) -> AppResult<Json<IsRegisteredResponse>> {
    let registered = state
        .services
        .registrations
        .is_registered(&claims, event_id, target.user_id)
        .await?;
    Ok(Json(IsRegisteredResponse { registered }))
}

/// All registrations of an event
#[utoipa::path(
    get,
    path = "/events/{id}/registrations",
    tag = "registrations",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Registrations", body = Vec<Registration>),
        (status = 403, description = "Not allowed to manage this event")
    )
)]
pub async fn list_registrations(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(event_id): Path<i64>,
) -> AppResult<Json<Vec<Registration>>> {
    let registrations = state.services.registrations.list_for_event(&claims, event_id).await?;
    Ok(Json(registrations))
}

/// Registrations joined with user profiles
#[utoipa::path(
    get,
    path = "/events/{id}/registered-users",
    tag = "registrations",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Registered users", body = Vec<RegisteredUser>),
        (status = 403, description = "Not allowed to manage this event")
    )
)]
pub async fn registered_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(event_id): Path<i64>,
) -> AppResult<Json<Vec<RegisteredUser>>> {
    let users = state.services.registrations.registered_users(&claims, event_id).await?;
    Ok(Json(users))
}

/// Mark an attendee as present
#[utoipa::path(
    put,
    path = "/events/{id}/registrations/{registration_id}/check-in",
    tag = "registrations",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Event ID"),
        ("registration_id" = i64, Path, description = "Registration ID")
    ),
    responses(
        (status = 200, description = "Checked in", body = Registration),
        (status = 400, description = "Already checked in or cancelled"),
        (status = 404, description = "Registration not found")
    )
)]
pub async fn check_in(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((event_id, registration_id)): Path<(i64, i64)>,
) -> AppResult<Json<Registration>> {
    let registration = state
        .services
        .registrations
        .check_in(&claims, event_id, registration_id)
        .await?;
    Ok(Json(registration))
}
