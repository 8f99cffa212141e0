//! Office endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::office::{Office, OfficeInput},
};

use super::AuthenticatedUser;

#[utoipa::path(
    get,
    path = "/offices",
    tag = "offices",
    responses((status = 200, description = "Offices", body = Vec<Office>))
)]
pub async fn list_offices(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Office>>> {
    let offices = state.services.offices.list().await?;
    Ok(Json(offices))
}

#[utoipa::path(
    get,
    path = "/offices/{id}",
    tag = "offices",
    params(("id" = i64, Path, description = "Office ID")),
    responses(
        (status = 200, description = "Office", body = Office),
        (status = 404, description = "Office not found")
    )
)]
pub async fn get_office(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Office>> {
    let office = state.services.offices.get_by_id(id).await?;
    Ok(Json(office))
}

#[utoipa::path(
    post,
    path = "/offices",
    tag = "offices",
    security(("bearer_auth" = [])),
    request_body = OfficeInput,
    responses(
        (status = 201, description = "Office created", body = Office),
        (status = 409, description = "Name or contact email already used")
    )
)]
pub async fn create_office(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<OfficeInput>,
) -> AppResult<(StatusCode, Json<Office>)> {
    claims.require_reviewer()?;
    let office = state.services.offices.create(&data).await?;
    Ok((StatusCode::CREATED, Json(office)))
}

#[utoipa::path(
    put,
    path = "/offices/{id}",
    tag = "offices",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Office ID")),
    request_body = OfficeInput,
    responses(
        (status = 200, description = "Office updated", body = Office),
        (status = 404, description = "Office not found")
    )
)]
pub async fn update_office(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(data): Json<OfficeInput>,
) -> AppResult<Json<Office>> {
    claims.require_reviewer()?;
    let office = state.services.offices.update(id, &data).await?;
    Ok(Json(office))
}

#[utoipa::path(
    delete,
    path = "/offices/{id}",
    tag = "offices",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Office ID")),
    responses(
        (status = 204, description = "Office deleted"),
        (status = 404, description = "Office not found")
    )
)]
pub async fn delete_office(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    claims.require_reviewer()?;
    state.services.offices.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
