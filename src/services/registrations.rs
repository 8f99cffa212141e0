//! Event registrations and check-in
//!
//! Registration and cancellation lock the event row for the whole
//! read-check-write sequence, so the capacity check and the recount of
//! CONFIRMED rows happen atomically.

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::RegistrationStatus,
        event::Event,
        registration::{RegisteredUser, Registration},
        user::{Recipient, UserClaims},
    },
    repository::Repository,
    services::notifications::NotificationService,
};

#[derive(Clone)]
pub struct RegistrationsService {
    repository: Repository,
    notifications: NotificationService,
}

impl RegistrationsService {
    pub fn new(repository: Repository, notifications: NotificationService) -> Self {
        Self { repository, notifications }
    }

    /// The caller acts for themselves unless staff-level
    fn target_user(claims: &UserClaims, requested: Option<i64>) -> AppResult<i64> {
        let user_id = requested.unwrap_or(claims.user_id);
        claims.require_self_or_staff(user_id)?;
        Ok(user_id)
    }

    /// Staff-level users, the event creator and its organizers see attendees
    fn ensure_can_manage(claims: &UserClaims, event: &Event) -> AppResult<()> {
        if claims.role.is_staff_level()
            || event.is_creator(claims.user_id)
            || event.is_organizer(claims.user_id)
        {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "You are not allowed to manage registrations for this event".to_string(),
            ))
        }
    }

    async fn recipient(&self, user_id: i64) -> Option<Recipient> {
        match self.repository.users.get_by_id(user_id).await {
            Ok(u) => Some(Recipient { id: u.id, username: u.username, email: u.email, role: u.role }),
            Err(e) => {
                tracing::error!(user_id, error = %e, "Failed to load registration recipient");
                None
            }
        }
    }

    pub async fn register(
        &self,
        claims: &UserClaims,
        event_id: i64,
        user_id: Option<i64>,
        notes: Option<&str>,
    ) -> AppResult<Registration> {
        let user_id = Self::target_user(claims, user_id)?;
        // 404 for unknown users before taking the lock
        self.repository.users.get_by_id(user_id).await?;

        let mut tx = self.repository.pool.begin().await?;
        let event = self.repository.events.lock(&mut tx, event_id).await?;
        event.ensure_accepts_registrations()?;

        let existing = self.repository.registrations.find(&mut tx, event_id, user_id).await?;
        let registration = match existing {
            Some(r) if r.status == RegistrationStatus::Confirmed => {
                return Err(AppError::InvalidState(
                    "User is already registered for this event".to_string(),
                ));
            }
            Some(r) => self.repository.registrations.reactivate(&mut tx, r.id, notes).await?,
            None => {
                self.repository
                    .registrations
                    .insert(&mut tx, event_id, user_id, notes)
                    .await?
            }
        };
        let count = self
            .repository
            .events
            .refresh_registration_count(&mut tx, event_id)
            .await?;
        tx.commit().await?;

        tracing::info!(event_id, user_id, registrations = count, "User registered for event");

        if let Some(recipient) = self.recipient(user_id).await {
            self.notifications.registration_confirmed(&event, &recipient).await;
        }
        Ok(registration)
    }

    pub async fn cancel(&self, claims: &UserClaims, event_id: i64, user_id: Option<i64>) -> AppResult<Registration> {
        let user_id = Self::target_user(claims, user_id)?;

        let mut tx = self.repository.pool.begin().await?;
        let event = self.repository.events.lock(&mut tx, event_id).await?;
        let existing = self
            .repository
            .registrations
            .find(&mut tx, event_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))?;

        let registration = self
            .repository
            .registrations
            .set_status(&mut tx, existing.id, RegistrationStatus::Cancelled)
            .await?;
        let count = self
            .repository
            .events
            .refresh_registration_count(&mut tx, event_id)
            .await?;
        tx.commit().await?;

        tracing::info!(event_id, user_id, registrations = count, "Registration cancelled");

        if let Some(recipient) = self.recipient(user_id).await {
            self.notifications.registration_cancelled(&event, &recipient).await;
        }
        Ok(registration)
    }

    pub async fn is_registered(&self, claims: &UserClaims, event_id: i64, user_id: Option<i64>) -> AppResult<bool> {
        let user_id = Self::target_user(claims, user_id)?;
        self.repository.registrations.is_registered(event_id, user_id).await
    }

    pub async fn list_for_event(&self, claims: &UserClaims, event_id: i64) -> AppResult<Vec<Registration>> {
        let event = self.repository.events.get_by_id(event_id).await?;
        Self::ensure_can_manage(claims, &event)?;
        self.repository.registrations.list_for_event(event_id).await
    }

    pub async fn registered_users(&self, claims: &UserClaims, event_id: i64) -> AppResult<Vec<RegisteredUser>> {
        let event = self.repository.events.get_by_id(event_id).await?;
        Self::ensure_can_manage(claims, &event)?;
        self.repository.registrations.registered_users(event_id).await
    }

    pub async fn for_user(&self, user_id: i64) -> AppResult<Vec<Registration>> {
        self.repository.registrations.list_for_user(user_id).await
    }

    /// Mark an attendee as present
    pub async fn check_in(&self, claims: &UserClaims, event_id: i64, registration_id: i64) -> AppResult<Registration> {
        let event = self.repository.events.get_by_id(event_id).await?;
        Self::ensure_can_manage(claims, &event)?;

        let registration = self
            .repository
            .registrations
            .get_for_event(event_id, registration_id)
            .await?;
        registration.ensure_can_check_in()?;

        let checked_in = self
            .repository
            .registrations
            .check_in(registration_id)
            .await?
            .ok_or_else(|| {
                AppError::InvalidState(
                    "Attendee is already checked in or the registration was cancelled.".to_string(),
                )
            })?;
        tracing::info!(event_id, registration_id, "Attendee checked in");
        Ok(checked_in)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        enums::{EventStatus, Role},
        event::tests::sample_event,
    };

    fn claims(user_id: i64, role: Role) -> UserClaims {
        UserClaims { sub: "u".to_string(), user_id, role, exp: 0, iat: 0 }
    }

    #[test]
    fn test_target_user_defaults_to_caller() {
        assert_eq!(RegistrationsService::target_user(&claims(5, Role::User), None).unwrap(), 5);
        assert_eq!(RegistrationsService::target_user(&claims(5, Role::User), Some(5)).unwrap(), 5);
    }

    #[test]
    fn test_only_staff_acts_for_others() {
        assert!(RegistrationsService::target_user(&claims(5, Role::User), Some(6)).is_err());
        assert!(RegistrationsService::target_user(&claims(5, Role::Organizer), Some(6)).is_err());
        assert_eq!(RegistrationsService::target_user(&claims(5, Role::Staff), Some(6)).unwrap(), 6);
    }

    #[test]
    fn test_manage_permissions() {
        let event = sample_event(EventStatus::Approved);
        assert!(RegistrationsService::ensure_can_manage(&claims(10, Role::Organizer), &event).is_ok());
        assert!(RegistrationsService::ensure_can_manage(&claims(11, Role::User), &event).is_ok());
        assert!(RegistrationsService::ensure_can_manage(&claims(1, Role::Manager), &event).is_ok());
        assert!(RegistrationsService::ensure_can_manage(&claims(99, Role::Organizer), &event).is_err());
    }
}
