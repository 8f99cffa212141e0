//! News endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::news::{News, NewsInput},
};

use super::AuthenticatedUser;

/// Active news, newest first
#[utoipa::path(
    get,
    path = "/news",
    tag = "news",
    responses((status = 200, description = "Active news", body = Vec<News>))
)]
pub async fn list_active_news(State(state): State<crate::AppState>) -> AppResult<Json<Vec<News>>> {
    let news = state.services.news.list_active().await?;
    Ok(Json(news))
}

/// All news including inactive ones
#[utoipa::path(
    get,
    path = "/news/all",
    tag = "news",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All news", body = Vec<News>))
)]
pub async fn list_all_news(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<News>>> {
    claims.require_staff()?;
    let news = state.services.news.list_all().await?;
    Ok(Json(news))
}

#[utoipa::path(
    get,
    path = "/news/{id}",
    tag = "news",
    params(("id" = i64, Path, description = "News ID")),
    responses(
        (status = 200, description = "News item", body = News),
        (status = 404, description = "News not found")
    )
)]
pub async fn get_news(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<News>> {
    let news = state.services.news.get_by_id(id).await?;
    Ok(Json(news))
}

#[utoipa::path(
    post,
    path = "/news",
    tag = "news",
    security(("bearer_auth" = [])),
    request_body = NewsInput,
    responses((status = 201, description = "News created", body = News))
)]
pub async fn create_news(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<NewsInput>,
) -> AppResult<(StatusCode, Json<News>)> {
    claims.require_staff()?;
    let news = state.services.news.create(&data).await?;
    Ok((StatusCode::CREATED, Json(news)))
}

#[utoipa::path(
    put,
    path = "/news/{id}",
    tag = "news",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "News ID")),
    request_body = NewsInput,
    responses(
        (status = 200, description = "News updated", body = News),
        (status = 404, description = "News not found")
    )
)]
pub async fn update_news(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(data): Json<NewsInput>,
) -> AppResult<Json<News>> {
    claims.require_staff()?;
    let news = state.services.news.update(id, &data).await?;
    Ok(Json(news))
}

/// Deactivate a news item
#[utoipa::path(
    delete,
    path = "/news/{id}",
    tag = "news",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "News ID")),
    responses(
        (status = 204, description = "News deactivated"),
        (status = 404, description = "News not found")
    )
)]
pub async fn delete_news(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    claims.require_staff()?;
    state.services.news.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
