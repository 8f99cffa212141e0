//! Statistics endpoints

use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, AppState};

use super::AuthenticatedUser;

#[derive(Serialize, ToSchema)]
pub struct EventCounts {
    pub total: i64,
    pub pending: i64,
    pub approved: i64,
    pub completed: i64,
    pub cancelled: i64,
    /// Events starting after now
    pub upcoming: i64,
}

#[derive(Serialize, ToSchema)]
pub struct UserCounts {
    pub total: i64,
    pub admins: i64,
    pub managers: i64,
    pub organizers: i64,
    pub staff: i64,
    pub regular_users: i64,
}

#[derive(Serialize, ToSchema)]
pub struct RegistrationCounts {
    pub total: i64,
    pub confirmed: i64,
    pub cancelled: i64,
}

/// Labelled count for chart data
#[derive(Serialize, ToSchema)]
pub struct StatEntry {
    pub label: String,
    pub count: i64,
}

#[derive(Serialize, ToSchema)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: i64,
}

#[derive(Serialize, ToSchema)]
pub struct StatsSummary {
    pub events: EventCounts,
    pub users: UserCounts,
    pub registrations: RegistrationCounts,
    pub total_departments: i64,
    pub total_offices: i64,
    pub events_by_status: Vec<StatEntry>,
    pub users_by_role: Vec<StatEntry>,
    /// One entry per day, oldest first
    pub registrations_last_30_days: Vec<DailyCount>,
}

/// Dashboard statistics
#[utoipa::path(
    get,
    path = "/statistics/summary",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Summary statistics", body = StatsSummary),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 403, description = "Insufficient permissions", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_summary(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<StatsSummary>> {
    claims.require_staff()?;
    let summary = state.services.stats.summary().await?;
    Ok(Json(summary))
}
