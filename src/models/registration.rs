//! Event registration model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::RegistrationStatus;
use crate::error::AppError;

/// One user's seat on one event
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Registration {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub registration_date: DateTime<Utc>,
    pub status: RegistrationStatus,
    pub attended: bool,
    pub check_in_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl Registration {
    pub fn ensure_can_check_in(&self) -> Result<(), AppError> {
        if self.attended {
            return Err(AppError::InvalidState("Attendee is already checked in.".to_string()));
        }
        if self.status == RegistrationStatus::Cancelled {
            return Err(AppError::InvalidState(
                "Cancelled registrations cannot be checked in.".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reference to a department or office
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrgUnitRef {
    pub id: i64,
    pub name: String,
}

/// Registration joined with the registered user's profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisteredUser {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub image_url: Option<String>,
    pub department: Option<OrgUnitRef>,
    pub office: Option<OrgUnitRef>,
    pub registration_id: i64,
    pub registration_date: DateTime<Utc>,
    pub status: RegistrationStatus,
    pub attended: bool,
    pub check_in_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Flat row backing [`RegisteredUser`]
#[derive(Debug, FromRow)]
pub struct RegisteredUserRow {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub image_url: Option<String>,
    pub department_id: Option<i64>,
    pub department_name: Option<String>,
    pub office_id: Option<i64>,
    pub office_name: Option<String>,
    pub registration_id: i64,
    pub registration_date: DateTime<Utc>,
    pub status: RegistrationStatus,
    pub attended: bool,
    pub check_in_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl From<RegisteredUserRow> for RegisteredUser {
    fn from(row: RegisteredUserRow) -> Self {
        let unit = |id: Option<i64>, name: Option<String>| match (id, name) {
            (Some(id), Some(name)) => Some(OrgUnitRef { id, name }),
            _ => None,
        };
        Self {
            user_id: row.user_id,
            username: row.username,
            email: row.email,
            image_url: row.image_url,
            department: unit(row.department_id, row.department_name),
            office: unit(row.office_id, row.office_name),
            registration_id: row.registration_id,
            registration_date: row.registration_date,
            status: row.status,
            attended: row.attended,
            check_in_time: row.check_in_time,
            notes: row.notes,
        }
    }
}

/// Optional target user for registration endpoints
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RegistrationTarget {
    /// Defaults to the authenticated user
    pub user_id: Option<i64>,
}

/// Optional notes on registration
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(status: RegistrationStatus, attended: bool) -> Registration {
        Registration {
            id: 1,
            event_id: 1,
            user_id: 1,
            registration_date: Utc::now(),
            status,
            attended,
            check_in_time: None,
            notes: None,
        }
    }

    #[test]
    fn test_check_in_rules() {
        assert!(registration(RegistrationStatus::Confirmed, false).ensure_can_check_in().is_ok());
        assert!(registration(RegistrationStatus::Confirmed, true).ensure_can_check_in().is_err());
        assert!(registration(RegistrationStatus::Cancelled, false).ensure_can_check_in().is_err());
    }

    #[test]
    fn test_registered_user_nests_units() {
        let row = RegisteredUserRow {
            user_id: 3,
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            image_url: None,
            department_id: Some(2),
            department_name: Some("Physics".to_string()),
            office_id: None,
            office_name: None,
            registration_id: 9,
            registration_date: Utc::now(),
            status: RegistrationStatus::Confirmed,
            attended: false,
            check_in_time: None,
            notes: None,
        };
        let user = RegisteredUser::from(row);
        assert_eq!(user.department.map(|d| d.name), Some("Physics".to_string()));
        assert!(user.office.is_none());
    }
}
