//! Post-event report endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        event::RejectRequest,
        event_report::{EventReport, EventReportInput},
    },
};

use super::AuthenticatedUser;

/// List all reports
#[utoipa::path(
    get,
    path = "/event-reports",
    tag = "event-reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Reports", body = Vec<EventReport>)
    )
)]
pub async fn list_reports(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<EventReport>>> {
    let reports = state.services.event_reports.list().await?;
    Ok(Json(reports))
}

/// Reports for one event
#[utoipa::path(
    get,
    path = "/event-reports/event/{event_id}",
    tag = "event-reports",
    security(("bearer_auth" = [])),
    params(("event_id" = i64, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Reports of the event", body = Vec<EventReport>)
    )
)]
pub async fn list_reports_by_event(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(event_id): Path<i64>,
) -> AppResult<Json<Vec<EventReport>>> {
    let reports = state.services.event_reports.list_by_event(event_id).await?;
    Ok(Json(reports))
}

/// Get a report
#[utoipa::path(
    get,
    path = "/event-reports/{id}",
    tag = "event-reports",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report", body = EventReport),
        (status = 404, description = "Report not found")
    )
)]
pub async fn get_report(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<EventReport>> {
    let report = state.services.event_reports.get_by_id(id).await?;
    Ok(Json(report))
}

/// Submit a report for an event
#[utoipa::path(
    post,
    path = "/event-reports",
    tag = "event-reports",
    security(("bearer_auth" = [])),
    request_body = EventReportInput,
    responses(
        (status = 201, description = "Report submitted", body = EventReport),
        (status = 404, description = "Event not found")
    )
)]
pub async fn create_report(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<EventReportInput>,
) -> AppResult<(StatusCode, Json<EventReport>)> {
    let report = state.services.event_reports.create(&claims, &data).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// Update a report
#[utoipa::path(
    put,
    path = "/event-reports/{id}",
    tag = "event-reports",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Report ID")),
    request_body = EventReportInput,
    responses(
        (status = 200, description = "Report updated", body = EventReport),
        (status = 403, description = "Not the submitter or a reviewer")
    )
)]
pub async fn update_report(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(data): Json<EventReportInput>,
) -> AppResult<Json<EventReport>> {
    let report = state.services.event_reports.update(&claims, id, &data).await?;
    Ok(Json(report))
}

/// Delete a report
#[utoipa::path(
    delete,
    path = "/event-reports/{id}",
    tag = "event-reports",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Report ID")),
    responses(
        (status = 204, description = "Report deleted"),
        (status = 404, description = "Report not found")
    )
)]
pub async fn delete_report(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.event_reports.delete(&claims, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Approve a report
#[utoipa::path(
    put,
    path = "/event-reports/{id}/approve",
    tag = "event-reports",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report approved", body = EventReport),
        (status = 403, description = "Reviewer role required")
    )
)]
pub async fn approve_report(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<EventReport>> {
    let report = state.services.event_reports.approve(&claims, id).await?;
    Ok(Json(report))
}

/// Reject a report
#[utoipa::path(
    put,
    path = "/event-reports/{id}/reject",
    tag = "event-reports",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Report ID")),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Report rejected", body = EventReport),
        (status = 400, description = "Reason missing"),
        (status = 403, description = "Reviewer role required")
    )
)]
pub async fn reject_report(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(request): Json<RejectRequest>,
) -> AppResult<Json<EventReport>> {
    let report = state.services.event_reports.reject(&claims, id, &request.reason).await?;
    Ok(Json(report))
}

/// Send an approved report back for revision
#[utoipa::path(
    put,
    path = "/event-reports/{id}/request-revision",
    tag = "event-reports",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Report ID")),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Revision requested", body = EventReport),
        (status = 400, description = "Report is not approved")
    )
)]
pub async fn request_revision(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(request): Json<RejectRequest>,
) -> AppResult<Json<EventReport>> {
    let report = state
        .services
        .event_reports
        .request_revision(&claims, id, &request.reason)
        .await?;
    Ok(Json(report))
}
