//! Homepage slider endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::slider::{Slider, SliderInput, SliderOrderRequest, SliderStatusRequest},
};

use super::AuthenticatedUser;

/// All sliders by display order
#[utoipa::path(
    get,
    path = "/sliders",
    tag = "sliders",
    responses((status = 200, description = "Sliders", body = Vec<Slider>))
)]
pub async fn list_sliders(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Slider>>> {
    let sliders = state.services.sliders.list(false).await?;
    Ok(Json(sliders))
}

/// Active sliders by display order
#[utoipa::path(
    get,
    path = "/sliders/active",
    tag = "sliders",
    responses((status = 200, description = "Active sliders", body = Vec<Slider>))
)]
pub async fn list_active_sliders(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Slider>>> {
    let sliders = state.services.sliders.list(true).await?;
    Ok(Json(sliders))
}

#[utoipa::path(
    get,
    path = "/sliders/{id}",
    tag = "sliders",
    params(("id" = i64, Path, description = "Slider ID")),
    responses(
        (status = 200, description = "Slider", body = Slider),
        (status = 404, description = "Slider not found")
    )
)]
pub async fn get_slider(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Slider>> {
    let slider = state.services.sliders.get_by_id(id).await?;
    Ok(Json(slider))
}

#[utoipa::path(
    post,
    path = "/sliders",
    tag = "sliders",
    security(("bearer_auth" = [])),
    request_body = SliderInput,
    responses(
        (status = 201, description = "Slider created", body = Slider),
        (status = 403, description = "ADMIN or STAFF required")
    )
)]
pub async fn create_slider(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<SliderInput>,
) -> AppResult<(StatusCode, Json<Slider>)> {
    claims.require_slider_editor()?;
    let slider = state.services.sliders.create(&data).await?;
    Ok((StatusCode::CREATED, Json(slider)))
}

#[utoipa::path(
    put,
    path = "/sliders/{id}",
    tag = "sliders",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Slider ID")),
    request_body = SliderInput,
    responses(
        (status = 200, description = "Slider updated", body = Slider),
        (status = 404, description = "Slider not found")
    )
)]
pub async fn update_slider(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(data): Json<SliderInput>,
) -> AppResult<Json<Slider>> {
    claims.require_slider_editor()?;
    let slider = state.services.sliders.update(id, &data).await?;
    Ok(Json(slider))
}

/// Toggle visibility
#[utoipa::path(
    put,
    path = "/sliders/{id}/status",
    tag = "sliders",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Slider ID")),
    request_body = SliderStatusRequest,
    responses((status = 200, description = "Status updated", body = Slider))
)]
pub async fn set_slider_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(request): Json<SliderStatusRequest>,
) -> AppResult<Json<Slider>> {
    claims.require_slider_editor()?;
    let slider = state.services.sliders.set_status(id, request.status).await?;
    Ok(Json(slider))
}

/// Move a slider in the display order
#[utoipa::path(
    put,
    path = "/sliders/{id}/order",
    tag = "sliders",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Slider ID")),
    request_body = SliderOrderRequest,
    responses((status = 200, description = "Order updated", body = Slider))
)]
pub async fn set_slider_order(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(request): Json<SliderOrderRequest>,
) -> AppResult<Json<Slider>> {
    claims.require_slider_editor()?;
    let slider = state.services.sliders.set_order(id, request.display_order).await?;
    Ok(Json(slider))
}

#[utoipa::path(
    delete,
    path = "/sliders/{id}",
    tag = "sliders",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Slider ID")),
    responses(
        (status = 204, description = "Slider deleted"),
        (status = 404, description = "Slider not found")
    )
)]
pub async fn delete_slider(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    claims.require_slider_editor()?;
    state.services.sliders.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
