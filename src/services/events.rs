//! Events service: creation, editing and the review workflow

use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{EventStatus, Role},
        event::{validate_window, CreateEvent, Event, EventQuery, UpdateEvent},
        user::{Recipient, UserClaims},
    },
    repository::Repository,
    services::notifications::NotificationService,
};

/// Roles notified about event submissions, edits and approvals
fn workflow_roles() -> Vec<Role> {
    Role::ALL.iter().copied().filter(|r| r.receives_workflow_mail()).collect()
}

/// Roles notified when a revised event comes back for review
const REVIEWER_ROLES: &[Role] = &[Role::Admin, Role::Manager];

#[derive(Clone)]
pub struct EventsService {
    repository: Repository,
    notifications: NotificationService,
}

impl EventsService {
    pub fn new(repository: Repository, notifications: NotificationService) -> Self {
        Self { repository, notifications }
    }

    pub async fn list(&self, query: &EventQuery) -> AppResult<Vec<Event>> {
        self.repository.events.list(query).await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Event> {
        self.repository.events.get_by_id(id).await
    }

    /// Recipients for workflow mail; lookup failures only cost the notification
    async fn recipients(&self, roles: &[Role]) -> Vec<Recipient> {
        match self.repository.users.recipients_with_roles(roles).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load notification recipients");
                Vec::new()
            }
        }
    }

    /// Drop organizer ids that do not match a user
    async fn resolve_organizers(&self, ids: &[i64]) -> AppResult<Vec<i64>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let found = self.repository.users.existing_ids(ids).await?;
        if found.len() != ids.len() {
            let missing: Vec<&i64> = ids.iter().filter(|id| !found.contains(id)).collect();
            tracing::warn!(?missing, "Ignoring unknown organizer ids");
        }
        Ok(found)
    }

    /// Create an event in PENDING state
    pub async fn create(&self, claims: &UserClaims, data: &CreateEvent) -> AppResult<Event> {
        claims.require_event_author()?;
        data.validate()?;
        data.validate_window(Utc::now())?;

        let organizers = self.resolve_organizers(&data.organizer_ids).await?;
        let event = self
            .repository
            .events
            .create(data, claims.user_id, &organizers)
            .await?;
        tracing::info!(event_id = event.id, created_by = claims.user_id, "Event created");

        let recipients = self.recipients(&workflow_roles()).await;
        self.notifications.event_created(&event, &recipients).await;
        Ok(event)
    }

    /// Edit an event. A NEEDS_REVISION event edited by its owners is resubmitted.
    pub async fn update(&self, claims: &UserClaims, id: i64, data: &UpdateEvent) -> AppResult<Event> {
        data.validate()?;
        let organizers = match data.organizer_ids {
            Some(ref ids) => Some(self.resolve_organizers(ids).await?),
            None => None,
        };

        // Same event row lock as register and cancel
        let mut tx = self.repository.pool.begin().await?;
        let current = self.repository.events.lock(&mut tx, id).await?;
        current.ensure_editable_by(claims)?;

        let (status, reason, resubmitted) = current.status_after_update(claims, data.status)?;

        validate_window(
            data.start_date.unwrap_or(current.start_date),
            data.end_date.unwrap_or(current.end_date),
        )?;
        if let Some(capacity) = data.capacity {
            current.ensure_capacity_covers(capacity)?;
        }

        self.repository
            .events
            .update(&mut tx, id, data, status, reason.as_deref(), organizers.as_deref())
            .await?;
        tx.commit().await?;

        let event = self.repository.events.get_by_id(id).await?;

        if current.status != event.status {
            tracing::info!(
                event_id = id,
                from = %current.status,
                to = %event.status,
                user_id = claims.user_id,
                "Event status changed"
            );
        }

        if resubmitted {
            let recipients = self.recipients(REVIEWER_ROLES).await;
            self.notifications.event_resubmitted(&event, &recipients).await;
        } else {
            let recipients = self.recipients(&workflow_roles()).await;
            self.notifications.event_updated(&event, &recipients).await;
        }
        Ok(event)
    }

    /// PENDING -> APPROVED
    pub async fn approve(&self, claims: &UserClaims, id: i64) -> AppResult<Event> {
        claims.require_reviewer()?;
        let current = self.repository.events.get_by_id(id).await?;
        let next = current.status.approve().map_err(AppError::InvalidState)?;

        self.apply_transition(id, current.status, next, None).await?;
        let event = self.repository.events.get_by_id(id).await?;
        tracing::info!(event_id = id, user_id = claims.user_id, "Event approved");

        let recipients = self.recipients(&workflow_roles()).await;
        self.notifications.event_approved(&event, &recipients).await;
        Ok(event)
    }

    /// PENDING -> NEEDS_REVISION with a reason
    pub async fn reject(&self, claims: &UserClaims, id: i64, reason: &str) -> AppResult<Event> {
        claims.require_reviewer()?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation("A rejection reason is required".to_string()));
        }
        let current = self.repository.events.get_by_id(id).await?;
        let next = current.status.reject().map_err(AppError::InvalidState)?;

        self.apply_transition(id, current.status, next, Some(reason)).await?;
        let event = self.repository.events.get_by_id(id).await?;
        tracing::info!(event_id = id, user_id = claims.user_id, "Event sent back for revision");

        let mut owners: Vec<i64> = event.organizer_ids.clone();
        owners.extend(event.created_by);
        owners.sort_unstable();
        owners.dedup();
        let recipients = match self.repository.users.recipients_by_ids(&owners).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load event owners");
                Vec::new()
            }
        };
        self.notifications.event_rejected(&event, reason, &recipients).await;
        Ok(event)
    }

    /// Conditional status write; loses cleanly against a concurrent transition
    async fn apply_transition(
        &self,
        id: i64,
        expected: EventStatus,
        next: EventStatus,
        reason: Option<&str>,
    ) -> AppResult<()> {
        if self.repository.events.transition(id, expected, next, reason).await? {
            Ok(())
        } else {
            Err(AppError::InvalidState(format!(
                "Event {} is no longer {}",
                id, expected
            )))
        }
    }

    pub async fn delete(&self, claims: &UserClaims, id: i64) -> AppResult<()> {
        let event = self.repository.events.get_by_id(id).await?;
        event.ensure_deletable_by(claims)?;
        self.repository.events.delete(id).await?;
        tracing::info!(event_id = id, user_id = claims.user_id, "Event deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_roles_exclude_plain_users() {
        assert_eq!(
            workflow_roles(),
            vec![Role::Admin, Role::Manager, Role::Organizer, Role::Staff]
        );
    }
}
