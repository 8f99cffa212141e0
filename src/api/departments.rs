//! Department endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::department::{Department, DepartmentInput},
};

use super::AuthenticatedUser;

#[utoipa::path(
    get,
    path = "/departments",
    tag = "departments",
    responses((status = 200, description = "Departments", body = Vec<Department>))
)]
pub async fn list_departments(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Department>>> {
    let departments = state.services.departments.list().await?;
    Ok(Json(departments))
}

#[utoipa::path(
    get,
    path = "/departments/{id}",
    tag = "departments",
    params(("id" = i64, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department", body = Department),
        (status = 404, description = "Department not found")
    )
)]
pub async fn get_department(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Department>> {
    let department = state.services.departments.get_by_id(id).await?;
    Ok(Json(department))
}

#[utoipa::path(
    post,
    path = "/departments",
    tag = "departments",
    security(("bearer_auth" = [])),
    request_body = DepartmentInput,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 409, description = "Name or contact email already used")
    )
)]
pub async fn create_department(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<DepartmentInput>,
) -> AppResult<(StatusCode, Json<Department>)> {
    claims.require_reviewer()?;
    let department = state.services.departments.create(&data).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

#[utoipa::path(
    put,
    path = "/departments/{id}",
    tag = "departments",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Department ID")),
    request_body = DepartmentInput,
    responses(
        (status = 200, description = "Department updated", body = Department),
        (status = 404, description = "Department not found")
    )
)]
pub async fn update_department(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(data): Json<DepartmentInput>,
) -> AppResult<Json<Department>> {
    claims.require_reviewer()?;
    let department = state.services.departments.update(id, &data).await?;
    Ok(Json(department))
}

#[utoipa::path(
    delete,
    path = "/departments/{id}",
    tag = "departments",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Department ID")),
    responses(
        (status = 204, description = "Department deleted"),
        (status = 404, description = "Department not found")
    )
)]
pub async fn delete_department(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    claims.require_reviewer()?;
    state.services.departments.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
