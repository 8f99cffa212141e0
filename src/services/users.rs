//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        enums::Role,
        user::{CreateUser, Recipient, RegisterUser, UpdateUser, User, UserClaims, UserQuery, UserRow},
    },
    repository::Repository,
    services::notifications::NotificationService,
};

const TEMPORARY_PASSWORD_LEN: usize = 10;

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
    notifications: NotificationService,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig, notifications: NotificationService) -> Self {
        Self { repository, config, notifications }
    }

    /// Authenticate user by username and return a JWT token
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !verify_password(&user.password, password)? {
            return Err(AppError::Authentication("Invalid username or password".to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        tracing::info!(user_id = user.id, "User logged in");
        Ok((token, user.into()))
    }

    /// Token lifetime in seconds
    pub fn token_lifetime(&self) -> i64 {
        self.config.jwt_expiration_hours as i64 * 3600
    }

    fn create_token_for_user(&self, user: &UserRow) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            role: user.role,
            exp: now + self.token_lifetime(),
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Public self-registration; always creates a USER
    pub async fn register(&self, data: RegisterUser) -> AppResult<User> {
        self.create_user(CreateUser::from(data)).await
    }

    /// Create a new user
    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        if let Some(field) = self
            .repository
            .users
            .identity_taken(Some(&user.username), Some(&user.email), None)
            .await?
        {
            return Err(AppError::Conflict(format!("A user with this {} already exists", field)));
        }
        self.check_org_units(user.department_id, user.office_id).await?;

        let hash = hash_password(&user.password)?;
        let created = self.repository.users.create(&user, &hash).await?;
        tracing::info!(user_id = created.id, role = %created.role, "User created");
        Ok(created.into())
    }

    /// Update a user. Only administrators may change roles.
    pub async fn update_user(&self, claims: &UserClaims, id: i64, mut user: UpdateUser) -> AppResult<User> {
        if !claims.is_admin() {
            if claims.user_id != id {
                return Err(AppError::Authorization("You can only update your own profile".to_string()));
            }
            if user.role.is_some() {
                return Err(AppError::Authorization("Only administrators can change roles".to_string()));
            }
        }

        if let Some(field) = self
            .repository
            .users
            .identity_taken(user.username.as_deref(), user.email.as_deref(), Some(id))
            .await?
        {
            return Err(AppError::Conflict(format!("A user with this {} already exists", field)));
        }
        self.check_org_units(user.department_id, user.office_id).await?;

        let password = match user.password.take() {
            Some(p) if !p.trim().is_empty() => Some(hash_password(&p)?),
            _ => None,
        };

        let updated = self.repository.users.update(id, &user, password).await?;
        Ok(updated.into())
    }

    async fn check_org_units(&self, department_id: Option<i64>, office_id: Option<i64>) -> AppResult<()> {
        if let Some(id) = department_id {
            if !self.repository.departments.exists(id).await? {
                return Err(AppError::NotFound(format!("Department {} not found", id)));
            }
        }
        if let Some(id) = office_id {
            if !self.repository.offices.exists(id).await? {
                return Err(AppError::NotFound(format!("Office {} not found", id)));
            }
        }
        Ok(())
    }

    /// Change own password after checking the current one
    pub async fn change_password(&self, user_id: i64, current: &str, new_password: &str) -> AppResult<()> {
        let user = self.repository.users.get_by_id(user_id).await?;
        if !verify_password(&user.password, current)? {
            return Err(AppError::Authentication("Current password is incorrect".to_string()));
        }
        self.set_password(user_id, new_password).await
    }

    /// Set a user's password without knowing the previous one
    pub async fn set_password(&self, user_id: i64, new_password: &str) -> AppResult<()> {
        if new_password.len() < 6 {
            return Err(AppError::Validation("Password must be at least 6 characters".to_string()));
        }
        let hash = hash_password(new_password)?;
        self.repository.users.set_password(user_id, &hash).await
    }

    /// Replace the password of the account behind `email` with a random one and mail it
    pub async fn forgot_password(&self, email: &str) -> AppResult<()> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No user found with email {}", email)))?;

        let temporary = generate_temporary_password();
        let hash = hash_password(&temporary)?;
        self.repository.users.set_password(user.id, &hash).await?;
        tracing::info!(user_id = user.id, "Temporary password issued");

        let recipient = Recipient {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
        };
        self.notifications.temporary_password(&recipient, &temporary).await;
        Ok(())
    }

    /// Create the `admin` account when it does not exist yet
    pub async fn ensure_default_admin(&self) -> AppResult<()> {
        if self.repository.users.get_by_username("admin").await?.is_some() {
            return Ok(());
        }
        let admin = CreateUser {
            username: "admin".to_string(),
            password: self.config.default_admin_password.clone(),
            email: "admin@example.com".to_string(),
            phone: None,
            image_url: None,
            role: Some(Role::Admin),
            department_id: None,
            office_id: None,
        };
        let hash = hash_password(&admin.password)?;
        self.repository.users.create(&admin, &hash).await?;
        tracing::warn!("Default admin account created, change its password");
        Ok(())
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<User> {
        Ok(self.repository.users.get_by_id(id).await?.into())
    }

    pub async fn search(&self, query: &UserQuery) -> AppResult<Vec<User>> {
        let rows = self.repository.users.search(query).await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    pub async fn delete(&self, claims: &UserClaims, id: i64) -> AppResult<()> {
        if claims.user_id == id {
            return Err(AppError::BadRequest("You cannot delete your own account".to_string()));
        }
        self.repository.users.delete(id).await
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn generate_temporary_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TEMPORARY_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("s3cret!").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "s3cret!").unwrap());
        assert!(!verify_password(&hash, "wrong").unwrap());
    }

    #[test]
    fn test_invalid_hash_is_error() {
        assert!(verify_password("not-a-hash", "x").is_err());
    }

    #[test]
    fn test_temporary_password_shape() {
        let pw = generate_temporary_password();
        assert_eq!(pw.len(), TEMPORARY_PASSWORD_LEN);
        assert!(pw.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(pw, generate_temporary_password());
    }
}
