//! Communication endpoints (news posts, announcements, event posts)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        communication::{Communication, CommunicationInput, CommunicationQuery},
        event::RejectRequest,
    },
};

use super::AuthenticatedUser;

/// List communications
#[utoipa::path(
    get,
    path = "/communications",
    tag = "communications",
    params(CommunicationQuery),
    responses(
        (status = 200, description = "Communications, newest first", body = Vec<Communication>)
    )
)]
pub async fn list_communications(
    State(state): State<crate::AppState>,
    Query(query): Query<CommunicationQuery>,
) -> AppResult<Json<Vec<Communication>>> {
    let items = state.services.communications.list(&query).await?;
    Ok(Json(items))
}

/// Get a communication
#[utoipa::path(
    get,
    path = "/communications/{id}",
    tag = "communications",
    params(("id" = i64, Path, description = "Communication ID")),
    responses(
        (status = 200, description = "Communication", body = Communication),
        (status = 404, description = "Communication not found")
    )
)]
pub async fn get_communication(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Communication>> {
    let item = state.services.communications.get_by_id(id).await?;
    Ok(Json(item))
}

/// Create a communication (starts PENDING)
#[utoipa::path(
    post,
    path = "/communications",
    tag = "communications",
    security(("bearer_auth" = [])),
    request_body = CommunicationInput,
    responses(
        (status = 201, description = "Communication created", body = Communication),
        (status = 404, description = "Office not found")
    )
)]
pub async fn create_communication(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CommunicationInput>,
) -> AppResult<(StatusCode, Json<Communication>)> {
    let item = state.services.communications.create(&claims, &data).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Update a communication
#[utoipa::path(
    put,
    path = "/communications/{id}",
    tag = "communications",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Communication ID")),
    request_body = CommunicationInput,
    responses(
        (status = 200, description = "Communication updated", body = Communication),
        (status = 403, description = "Not the author or a reviewer")
    )
)]
pub async fn update_communication(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(data): Json<CommunicationInput>,
) -> AppResult<Json<Communication>> {
    let item = state.services.communications.update(&claims, id, &data).await?;
    Ok(Json(item))
}

/// Delete a communication
#[utoipa::path(
    delete,
    path = "/communications/{id}",
    tag = "communications",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Communication ID")),
    responses(
        (status = 204, description = "Communication deleted"),
        (status = 403, description = "Not the author or an administrator")
    )
)]
pub async fn delete_communication(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.communications.delete(&claims, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Publish a communication
#[utoipa::path(
    put,
    path = "/communications/{id}/approve",
    tag = "communications",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Communication ID")),
    responses(
        (status = 200, description = "Communication published", body = Communication),
        (status = 403, description = "Reviewer role required")
    )
)]
pub async fn approve_communication(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Communication>> {
    let item = state.services.communications.approve(&claims, id).await?;
    Ok(Json(item))
}

/// Reject a communication
#[utoipa::path(
    put,
    path = "/communications/{id}/reject",
    tag = "communications",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Communication ID")),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Communication rejected", body = Communication),
        (status = 400, description = "Reason missing"),
        (status = 403, description = "Reviewer role required")
    )
)]
pub async fn reject_communication(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(request): Json<RejectRequest>,
) -> AppResult<Json<Communication>> {
    let item = state.services.communications.reject(&claims, id, &request.reason).await?;
    Ok(Json(item))
}

/// Withdraw a published communication for revision
#[utoipa::path(
    put,
    path = "/communications/{id}/unapprove",
    tag = "communications",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Communication ID")),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Communication needs revision", body = Communication),
        (status = 400, description = "Not published or reason missing")
    )
)]
pub async fn unapprove_communication(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(request): Json<RejectRequest>,
) -> AppResult<Json<Communication>> {
    let item = state.services.communications.unapprove(&claims, id, &request.reason).await?;
    Ok(Json(item))
}

/// Submit a draft or revised communication for review
#[utoipa::path(
    put,
    path = "/communications/{id}/submit",
    tag = "communications",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Communication ID")),
    responses(
        (status = 200, description = "Communication submitted", body = Communication)
    )
)]
pub async fn submit_communication(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Communication>> {
    let item = state.services.communications.submit(&claims, id).await?;
    Ok(Json(item))
}

/// Count a share
#[utoipa::path(
    post,
    path = "/communications/{id}/share",
    tag = "communications",
    params(("id" = i64, Path, description = "Communication ID")),
    responses(
        (status = 200, description = "Share counted", body = Communication)
    )
)]
pub async fn share_communication(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Communication>> {
    let item = state.services.communications.share(id).await?;
    Ok(Json(item))
}

/// Count a view
#[utoipa::path(
    post,
    path = "/communications/{id}/view",
    tag = "communications",
    params(("id" = i64, Path, description = "Communication ID")),
    responses(
        (status = 200, description = "View counted", body = Communication)
    )
)]
pub async fn view_communication(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Communication>> {
    let item = state.services.communications.view(id).await?;
    Ok(Json(item))
}
