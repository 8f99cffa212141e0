//! Post-event reports and their review

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::EventReportStatus,
        event_report::{EventReport, EventReportInput},
        user::UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct EventReportsService {
    repository: Repository,
}

impl EventReportsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<EventReport>> {
        self.repository.event_reports.list().await
    }

    pub async fn list_by_event(&self, event_id: i64) -> AppResult<Vec<EventReport>> {
        self.repository.event_reports.list_by_event(event_id).await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<EventReport> {
        self.repository.event_reports.get_by_id(id).await
    }

    /// Copies the event title and organizer into the report
    pub async fn create(&self, claims: &UserClaims, data: &EventReportInput) -> AppResult<EventReport> {
        data.validate()?;
        let event = self.repository.events.get_by_id(data.event_id).await?;
        let report = self
            .repository
            .event_reports
            .create(data, &event.title, event.organizer.as_deref(), claims.user_id)
            .await?;
        tracing::info!(report_id = report.id, event_id = event.id, "Event report submitted");
        Ok(report)
    }

    fn ensure_owner_or_reviewer(claims: &UserClaims, report: &EventReport) -> AppResult<()> {
        if claims.role.can_review() || report.submitted_by == Some(claims.user_id) {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Only the submitter or a reviewer can modify this report".to_string(),
            ))
        }
    }

    pub async fn update(&self, claims: &UserClaims, id: i64, data: &EventReportInput) -> AppResult<EventReport> {
        data.validate()?;
        let current = self.repository.event_reports.get_by_id(id).await?;
        Self::ensure_owner_or_reviewer(claims, &current)?;
        if data.event_id != current.event_id {
            return Err(AppError::BadRequest("A report cannot be moved to another event".to_string()));
        }
        let resubmit = current.returns_to_review_on_edit();
        self.repository.event_reports.update(id, data, resubmit).await
    }

    pub async fn approve(&self, claims: &UserClaims, id: i64) -> AppResult<EventReport> {
        claims.require_reviewer()?;
        let report = self.repository.event_reports.approve(id, claims.user_id).await?;
        tracing::info!(report_id = id, "Event report approved");
        Ok(report)
    }

    pub async fn reject(&self, claims: &UserClaims, id: i64, reason: &str) -> AppResult<EventReport> {
        claims.require_reviewer()?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation("A rejection reason is required".to_string()));
        }
        self.repository.event_reports.reject(id, claims.user_id, reason).await
    }

    /// APPROVED -> PENDING with a revision request
    pub async fn request_revision(&self, claims: &UserClaims, id: i64, reason: &str) -> AppResult<EventReport> {
        claims.require_reviewer()?;
        let current = self.repository.event_reports.get_by_id(id).await?;
        if current.status != EventReportStatus::Approved {
            return Err(AppError::InvalidState(
                "Revision can only be requested for approved reports".to_string(),
            ));
        }
        self.repository
            .event_reports
            .request_revision(id, claims.user_id, reason.trim())
            .await?
            .ok_or_else(|| AppError::InvalidState(format!("Event report {} is no longer approved", id)))
    }

    pub async fn delete(&self, claims: &UserClaims, id: i64) -> AppResult<()> {
        let current = self.repository.event_reports.get_by_id(id).await?;
        Self::ensure_owner_or_reviewer(claims, &current)?;
        self.repository.event_reports.delete(id).await
    }
}
