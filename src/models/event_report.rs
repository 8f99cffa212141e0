//! Post-event report model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::EventReportStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EventReport {
    pub id: i64,
    pub event_id: i64,
    pub event_name: String,
    pub organizer: Option<String>,
    pub department: Option<String>,
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    pub attendees: Option<i32>,
    pub summary: Option<String>,
    pub outcomes: Option<String>,
    pub challenges: Option<String>,
    pub recommendations: Option<String>,
    /// Stored file names under the uploads directory
    pub attachments: Vec<String>,
    pub status: EventReportStatus,
    pub submitted_by: Option<i64>,
    pub submitted_date: DateTime<Utc>,
    pub approved_by: Option<i64>,
    pub approved_date: Option<DateTime<Utc>>,
    pub rejected_by: Option<i64>,
    pub rejected_date: Option<DateTime<Utc>>,
    pub reject_reason: Option<String>,
    pub revision_requested_by: Option<i64>,
    pub revision_requested_date: Option<DateTime<Utc>>,
    pub revision_reason: Option<String>,
}

impl EventReport {
    /// Whether an edit sends the report back into review
    pub fn returns_to_review_on_edit(&self) -> bool {
        self.status == EventReportStatus::Rejected || self.revision_requested_by.is_some()
    }
}

/// Create or update a report
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EventReportInput {
    pub event_id: i64,
    pub department: Option<String>,
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    #[validate(range(min = 0, message = "Attendees cannot be negative"))]
    pub attendees: Option<i32>,
    pub summary: Option<String>,
    pub outcomes: Option<String>,
    pub challenges: Option<String>,
    pub recommendations: Option<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
}
