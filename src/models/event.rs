//! Event model and the rules attached to it

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{enums::{EventStatus, Role}, user::UserClaims};
use crate::error::AppError;

/// Event record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Display name of the organizing body
    pub organizer: Option<String>,
    /// Maximum number of confirmed registrations
    pub capacity: i32,
    pub image: Option<String>,
    pub target_audience: Option<String>,
    pub speaker: Option<String>,
    pub travel_plan: Option<String>,
    pub transportation: Option<String>,
    pub status: EventStatus,
    /// Cached count of CONFIRMED registrations
    pub registrations: i32,
    pub created_by: Option<i64>,
    pub rejection_reason: Option<String>,
    /// Users credited with managing the event
    pub organizer_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn is_creator(&self, user_id: i64) -> bool {
        self.created_by == Some(user_id)
    }

    pub fn is_organizer(&self, user_id: i64) -> bool {
        self.organizer_ids.contains(&user_id)
    }

    /// Registration is open only on approved events with a free seat
    pub fn ensure_accepts_registrations(&self) -> Result<(), AppError> {
        if self.status != EventStatus::Approved {
            return Err(AppError::InvalidState(
                "Registration is only available for approved events".to_string(),
            ));
        }
        if self.registrations >= self.capacity {
            return Err(AppError::InvalidState("Event is already at full capacity".to_string()));
        }
        Ok(())
    }

    /// Reviewers, the creator and listed organizers may edit an event
    /// A new capacity may not drop below the confirmed registrations
    pub fn ensure_capacity_covers(&self, capacity: i32) -> Result<(), AppError> {
        if capacity < self.registrations {
            return Err(AppError::InvalidState(format!(
                "Capacity cannot be lower than the {} confirmed registrations",
                self.registrations
            )));
        }
        Ok(())
    }

    pub fn ensure_editable_by(&self, claims: &UserClaims) -> Result<(), AppError> {
        if claims.role.can_review()
            || self.is_creator(claims.user_id)
            || self.is_organizer(claims.user_id)
        {
            Ok(())
        } else {
            Err(AppError::Authorization("You are not allowed to edit this event".to_string()))
        }
    }

    /// ADMIN deletes anything, MANAGER anything not yet completed,
    /// the creator only while the event is still pending.
    pub fn ensure_deletable_by(&self, claims: &UserClaims) -> Result<(), AppError> {
        let allowed = match claims.role {
            Role::Admin => true,
            Role::Manager if self.status != EventStatus::Completed => true,
            _ => self.is_creator(claims.user_id) && self.status == EventStatus::Pending,
        };
        if allowed {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "You do not have permission to delete this event".to_string(),
            ))
        }
    }

    /// Status and rejection reason after an edit.
    ///
    /// Returns `(status, rejection_reason, resubmitted)`.
    pub fn status_after_update(
        &self,
        claims: &UserClaims,
        requested: Option<EventStatus>,
    ) -> Result<(EventStatus, Option<String>, bool), AppError> {
        if self.status == EventStatus::NeedsRevision {
            return Ok((self.status.after_edit(), None, true));
        }

        let Some(next) = requested else {
            return Ok((self.status, self.rejection_reason.clone(), false));
        };

        if claims.role.can_review() {
            let reason = if next == EventStatus::NeedsRevision {
                self.rejection_reason.clone()
            } else {
                None
            };
            return Ok((next, reason, false));
        }

        if self.is_creator(claims.user_id) && self.status.creator_may_set(next) {
            return Ok((next, self.rejection_reason.clone(), false));
        }

        if next == self.status {
            return Ok((next, self.rejection_reason.clone(), false));
        }

        Err(AppError::Authorization(format!(
            "You are not allowed to change the status from {} to {}",
            self.status, next
        )))
    }
}

/// Create event request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEvent {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub organizer: Option<String>,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: i32,
    pub image: Option<String>,
    pub target_audience: Option<String>,
    pub speaker: Option<String>,
    pub travel_plan: Option<String>,
    pub transportation: Option<String>,
    #[serde(default)]
    pub organizer_ids: Vec<i64>,
}

impl CreateEvent {
    /// The event must not start in the past and must end after it starts
    pub fn validate_window(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        if self.start_date < now {
            return Err(AppError::Validation("Start date must be in the present or future".to_string()));
        }
        validate_window(self.start_date, self.end_date)
    }
}

pub(crate) fn validate_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::Validation("End date must not be before start date".to_string()));
    }
    Ok(())
}

/// Update event request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEvent {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub organizer: Option<String>,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<i32>,
    pub image: Option<String>,
    pub target_audience: Option<String>,
    pub speaker: Option<String>,
    pub travel_plan: Option<String>,
    pub transportation: Option<String>,
    pub status: Option<EventStatus>,
    /// Replaces the organizer set when present
    pub organizer_ids: Option<Vec<i64>>,
}

/// Reject request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct RejectRequest {
    pub reason: String,
}

/// Query parameters for events
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct EventQuery {
    pub status: Option<EventStatus>,
    /// Case-insensitive search in title, description and location
    pub search: Option<String>,
    pub created_by: Option<i64>,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration;

    pub fn sample_event(status: EventStatus) -> Event {
        let now = Utc::now();
        Event {
            id: 1,
            title: "Spring workshop".to_string(),
            description: None,
            location: Some("Hall A".to_string()),
            start_date: now + Duration::days(3),
            end_date: now + Duration::days(3) + Duration::hours(2),
            organizer: Some("IT Office".to_string()),
            capacity: 2,
            image: None,
            target_audience: None,
            speaker: None,
            travel_plan: None,
            transportation: None,
            status,
            registrations: 0,
            created_by: Some(10),
            rejection_reason: None,
            organizer_ids: vec![11],
            created_at: now,
            updated_at: now,
        }
    }

    fn claims(user_id: i64, role: Role) -> UserClaims {
        UserClaims { sub: "u".to_string(), user_id, role, exp: 0, iat: 0 }
    }

    #[test]
    fn test_registration_requires_approved() {
        for status in EventStatus::ALL.iter().filter(|s| **s != EventStatus::Approved) {
            let event = sample_event(*status);
            assert!(matches!(
                event.ensure_accepts_registrations(),
                Err(AppError::InvalidState(_))
            ));
        }
        assert!(sample_event(EventStatus::Approved).ensure_accepts_registrations().is_ok());
    }

    #[test]
    fn test_registration_rejects_full_event() {
        let mut event = sample_event(EventStatus::Approved);
        event.registrations = event.capacity;
        let err = event.ensure_accepts_registrations().unwrap_err();
        assert_eq!(err.to_string(), "Invalid state: Event is already at full capacity");
    }

    #[test]
    fn test_capacity_cannot_drop_below_registrations() {
        let mut event = sample_event(EventStatus::Approved);
        event.registrations = 2;
        assert!(event.ensure_capacity_covers(2).is_ok());
        assert!(event.ensure_capacity_covers(5).is_ok());
        assert!(matches!(
            event.ensure_capacity_covers(1),
            Err(AppError::InvalidState(_))
        ));
    }

    #[test]
    fn test_delete_permissions() {
        let pending = sample_event(EventStatus::Pending);
        let approved = sample_event(EventStatus::Approved);
        let completed = sample_event(EventStatus::Completed);

        assert!(completed.ensure_deletable_by(&claims(1, Role::Admin)).is_ok());
        assert!(approved.ensure_deletable_by(&claims(1, Role::Manager)).is_ok());
        assert!(completed.ensure_deletable_by(&claims(1, Role::Manager)).is_err());
        assert!(pending.ensure_deletable_by(&claims(10, Role::Organizer)).is_ok());
        assert!(approved.ensure_deletable_by(&claims(10, Role::Organizer)).is_err());
        assert!(pending.ensure_deletable_by(&claims(11, Role::Organizer)).is_err());
    }

    #[test]
    fn test_edit_permissions() {
        let event = sample_event(EventStatus::Pending);
        assert!(event.ensure_editable_by(&claims(10, Role::Organizer)).is_ok());
        assert!(event.ensure_editable_by(&claims(11, Role::Staff)).is_ok());
        assert!(event.ensure_editable_by(&claims(12, Role::Manager)).is_ok());
        assert!(event.ensure_editable_by(&claims(12, Role::Organizer)).is_err());
    }

    #[test]
    fn test_update_resubmits_revision() {
        let mut event = sample_event(EventStatus::NeedsRevision);
        event.rejection_reason = Some("Missing agenda".to_string());
        let (status, reason, resubmitted) = event
            .status_after_update(&claims(10, Role::Organizer), Some(EventStatus::Approved))
            .unwrap();
        assert_eq!(status, EventStatus::Pending);
        assert_eq!(reason, None);
        assert!(resubmitted);
    }

    #[test]
    fn test_update_status_by_reviewer_clears_reason() {
        let mut event = sample_event(EventStatus::Approved);
        event.rejection_reason = Some("old".to_string());
        let (status, reason, _) = event
            .status_after_update(&claims(1, Role::Admin), Some(EventStatus::Completed))
            .unwrap();
        assert_eq!(status, EventStatus::Completed);
        assert_eq!(reason, None);
    }

    #[test]
    fn test_update_status_by_creator() {
        let event = sample_event(EventStatus::Pending);
        let (status, _, _) = event
            .status_after_update(&claims(10, Role::Organizer), Some(EventStatus::Cancelled))
            .unwrap();
        assert_eq!(status, EventStatus::Cancelled);

        assert!(event
            .status_after_update(&claims(10, Role::Organizer), Some(EventStatus::Approved))
            .is_err());
        assert!(event
            .status_after_update(&claims(11, Role::Organizer), Some(EventStatus::Cancelled))
            .is_err());
    }

    #[test]
    fn test_create_window() {
        let now = Utc::now();
        let mut data = CreateEvent {
            title: "t".to_string(),
            description: None,
            location: None,
            start_date: now + Duration::hours(1),
            end_date: now + Duration::hours(2),
            organizer: None,
            capacity: 10,
            image: None,
            target_audience: None,
            speaker: None,
            travel_plan: None,
            transportation: None,
            organizer_ids: vec![],
        };
        assert!(data.validate_window(now).is_ok());
        data.end_date = now;
        assert!(data.validate_window(now).is_err());
        data.start_date = now - Duration::hours(1);
        assert!(data.validate_window(now).is_err());
        data.capacity = 0;
        assert!(data.validate().is_err());
    }
}
