//! Event reports repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::EventReportStatus,
        event_report::{EventReport, EventReportInput},
    },
};

#[derive(Clone)]
pub struct EventReportsRepository {
    pool: Pool<Postgres>,
}

impl EventReportsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn not_found(id: i64) -> AppError {
        AppError::NotFound(format!("Event report {} not found", id))
    }

    pub async fn list(&self) -> AppResult<Vec<EventReport>> {
        let rows = sqlx::query_as::<_, EventReport>(
            "SELECT * FROM event_reports ORDER BY submitted_date DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_by_event(&self, event_id: i64) -> AppResult<Vec<EventReport>> {
        let rows = sqlx::query_as::<_, EventReport>(
            "SELECT * FROM event_reports WHERE event_id = $1 ORDER BY submitted_date DESC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<EventReport> {
        sqlx::query_as::<_, EventReport>("SELECT * FROM event_reports WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    pub async fn create(
        &self,
        data: &EventReportInput,
        event_name: &str,
        organizer: Option<&str>,
        submitted_by: i64,
    ) -> AppResult<EventReport> {
        let row = sqlx::query_as::<_, EventReport>(
            r#"
            INSERT INTO event_reports (
                event_id, event_name, organizer, department, date, location, attendees,
                summary, outcomes, challenges, recommendations, attachments,
                status, submitted_by, submitted_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, NOW())
            RETURNING *
            "#,
        )
        .bind(data.event_id)
        .bind(event_name)
        .bind(organizer)
        .bind(&data.department)
        .bind(data.date)
        .bind(&data.location)
        .bind(data.attendees)
        .bind(&data.summary)
        .bind(&data.outcomes)
        .bind(&data.challenges)
        .bind(&data.recommendations)
        .bind(&data.attachments)
        .bind(EventReportStatus::Pending)
        .bind(submitted_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Replace the body of a report. With `resubmit`, the report returns to
    /// PENDING and every review field is cleared.
    pub async fn update(&self, id: i64, data: &EventReportInput, resubmit: bool) -> AppResult<EventReport> {
        let review_reset = if resubmit {
            r#",
                status = 'PENDING',
                approved_by = NULL, approved_date = NULL,
                rejected_by = NULL, rejected_date = NULL, reject_reason = NULL,
                revision_requested_by = NULL, revision_requested_date = NULL, revision_reason = NULL"#
        } else {
            ""
        };
        let query = format!(
            r#"
            UPDATE event_reports SET
                department = $1, date = $2, location = $3, attendees = $4,
                summary = $5, outcomes = $6, challenges = $7, recommendations = $8,
                attachments = $9{}
            WHERE id = $10
            RETURNING *
            "#,
            review_reset
        );
        sqlx::query_as::<_, EventReport>(&query)
            .bind(&data.department)
            .bind(data.date)
            .bind(&data.location)
            .bind(data.attendees)
            .bind(&data.summary)
            .bind(&data.outcomes)
            .bind(&data.challenges)
            .bind(&data.recommendations)
            .bind(&data.attachments)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    pub async fn approve(&self, id: i64, approved_by: i64) -> AppResult<EventReport> {
        sqlx::query_as::<_, EventReport>(
            r#"
            UPDATE event_reports SET
                status = $1, approved_by = $2, approved_date = NOW(),
                rejected_by = NULL, rejected_date = NULL, reject_reason = NULL,
                revision_requested_by = NULL, revision_requested_date = NULL, revision_reason = NULL
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(EventReportStatus::Approved)
        .bind(approved_by)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Self::not_found(id))
    }

    pub async fn reject(&self, id: i64, rejected_by: i64, reason: &str) -> AppResult<EventReport> {
        sqlx::query_as::<_, EventReport>(
            r#"
            UPDATE event_reports SET
                status = $1, rejected_by = $2, rejected_date = NOW(), reject_reason = $3,
                approved_by = NULL, approved_date = NULL,
                revision_requested_by = NULL, revision_requested_date = NULL, revision_reason = NULL
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(EventReportStatus::Rejected)
        .bind(rejected_by)
        .bind(reason)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Self::not_found(id))
    }

    /// APPROVED -> PENDING with revision metadata. Returns None when the
    /// report is not approved anymore.
    pub async fn request_revision(&self, id: i64, requested_by: i64, reason: &str) -> AppResult<Option<EventReport>> {
        let row = sqlx::query_as::<_, EventReport>(
            r#"
            UPDATE event_reports SET
                status = $1, revision_requested_by = $2, revision_requested_date = NOW(),
                revision_reason = $3
            WHERE id = $4 AND status = $5
            RETURNING *
            "#,
        )
        .bind(EventReportStatus::Pending)
        .bind(requested_by)
        .bind(reason)
        .bind(id)
        .bind(EventReportStatus::Approved)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM event_reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Self::not_found(id));
        }
        Ok(())
    }
}
