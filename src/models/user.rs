//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::Role;
use crate::error::AppError;

/// Full user record as stored in the database
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub email: String,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub role: Role,
    pub department_id: Option<i64>,
    pub office_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User as exposed through the API (no password hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub role: Role,
    pub department_id: Option<i64>,
    pub office_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            phone: row.phone,
            image_url: row.image_url,
            role: row.role,
            department_id: row.department_id,
            office_id: row.office_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Minimal recipient information used for notifications
#[derive(Debug, Clone, FromRow)]
pub struct Recipient {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
}

/// User query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct UserQuery {
    /// Case-insensitive username substring
    pub username: Option<String>,
    pub role: Option<Role>,
}

/// Public self-registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUser {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub department_id: Option<i64>,
    pub office_id: Option<i64>,
}

/// Create user request (administrators)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub role: Option<Role>,
    pub department_id: Option<i64>,
    pub office_id: Option<i64>,
}

impl From<RegisterUser> for CreateUser {
    fn from(r: RegisterUser) -> Self {
        Self {
            username: r.username,
            password: r.password,
            email: r.email,
            phone: r.phone,
            image_url: r.image_url,
            role: Some(Role::User),
            department_id: r.department_id,
            office_id: r.office_id,
        }
    }
}

/// Update user request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: Option<String>,
    /// Ignored when empty
    pub password: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub role: Option<Role>,
    pub department_id: Option<i64>,
    pub office_id: Option<i64>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i64,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }

    /// ADMIN or MANAGER
    pub fn require_reviewer(&self) -> Result<(), AppError> {
        if self.role.can_review() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Only ADMIN or MANAGER can perform this action".to_string(),
            ))
        }
    }

    /// ADMIN, MANAGER or STAFF
    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.role.is_staff_level() {
            Ok(())
        } else {
            Err(AppError::Authorization("Staff privileges required".to_string()))
        }
    }

    /// Roles that may propose events
    pub fn require_event_author(&self) -> Result<(), AppError> {
        if self.role != Role::User {
            Ok(())
        } else {
            Err(AppError::Authorization("Users cannot create events".to_string()))
        }
    }

    /// Whether the caller may read or modify data owned by `user_id`
    pub fn require_self_or_staff(&self, user_id: i64) -> Result<(), AppError> {
        if self.user_id == user_id || self.role.is_staff_level() {
            Ok(())
        } else {
            Err(AppError::Authorization("Access to another user's data denied".to_string()))
        }
    }

    /// Sliders are managed by ADMIN and STAFF
    pub fn require_slider_editor(&self) -> Result<(), AppError> {
        if matches!(self.role, Role::Admin | Role::Staff) {
            Ok(())
        } else {
            Err(AppError::Authorization("Only ADMIN or STAFF can manage sliders".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role) -> UserClaims {
        let now = Utc::now().timestamp();
        UserClaims {
            sub: "alice".to_string(),
            user_id: 7,
            role,
            exp: now + 3600,
            iat: now,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let token = claims(Role::Manager).create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.user_id, 7);
        assert_eq!(parsed.role, Role::Manager);
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_role_requirements() {
        assert!(claims(Role::Admin).require_admin().is_ok());
        assert!(claims(Role::Manager).require_admin().is_err());
        assert!(claims(Role::Manager).require_reviewer().is_ok());
        assert!(claims(Role::Organizer).require_reviewer().is_err());
        assert!(claims(Role::Staff).require_staff().is_ok());
        assert!(claims(Role::User).require_event_author().is_err());
        assert!(claims(Role::Organizer).require_event_author().is_ok());
        assert!(claims(Role::Staff).require_slider_editor().is_ok());
        assert!(claims(Role::Manager).require_slider_editor().is_err());
    }

    #[test]
    fn test_self_or_staff() {
        assert!(claims(Role::User).require_self_or_staff(7).is_ok());
        assert!(claims(Role::User).require_self_or_staff(8).is_err());
        assert!(claims(Role::Staff).require_self_or_staff(8).is_ok());
    }
}
