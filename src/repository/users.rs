//! Users repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::Role,
        user::{CreateUser, Recipient, UpdateUser, UserQuery, UserRow},
    },
};

const USER_COLUMNS: &str = "id, username, password, email, phone, image_url, role, \
     department_id, office_id, created_at, updated_at";

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<UserRow> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Get user by username (case-insensitive)
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<UserRow>> {
        let query = format!("SELECT {} FROM users WHERE LOWER(username) = LOWER($1)", USER_COLUMNS);
        let user = sqlx::query_as::<_, UserRow>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Get user by email (case-insensitive)
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<UserRow>> {
        let query = format!("SELECT {} FROM users WHERE LOWER(email) = LOWER($1)", USER_COLUMNS);
        let user = sqlx::query_as::<_, UserRow>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Check whether a username or email is already taken by another user
    pub async fn identity_taken(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        exclude_id: Option<i64>,
    ) -> AppResult<Option<&'static str>> {
        if let Some(username) = username {
            let exists: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(username) = LOWER($1) AND ($2::BIGINT IS NULL OR id != $2))",
            )
            .bind(username)
            .bind(exclude_id)
            .fetch_one(&self.pool)
            .await?;
            if exists {
                return Ok(Some("username"));
            }
        }
        if let Some(email) = email {
            let exists: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) AND ($2::BIGINT IS NULL OR id != $2))",
            )
            .bind(email)
            .bind(exclude_id)
            .fetch_one(&self.pool)
            .await?;
            if exists {
                return Ok(Some("email"));
            }
        }
        Ok(None)
    }

    /// List users, optionally filtered by username substring and role
    pub async fn search(&self, query: &UserQuery) -> AppResult<Vec<UserRow>> {
        let pattern = query
            .username
            .as_ref()
            .map(|u| format!("%{}%", u.to_lowercase()));

        let sql = format!(
            r#"
            SELECT {} FROM users
            WHERE ($1::TEXT IS NULL OR LOWER(username) LIKE $1)
              AND ($2::TEXT IS NULL OR role = $2)
            ORDER BY username
            "#,
            USER_COLUMNS
        );
        let users = sqlx::query_as::<_, UserRow>(&sql)
            .bind(pattern)
            .bind(query.role)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    /// Recipients of workflow mail: every user whose role is in `roles`
    pub async fn recipients_with_roles(&self, roles: &[Role]) -> AppResult<Vec<Recipient>> {
        let labels: Vec<&str> = roles.iter().map(|r| r.as_str()).collect();
        let recipients = sqlx::query_as::<_, Recipient>(
            "SELECT id, username, email, role FROM users WHERE role = ANY($1) ORDER BY id",
        )
        .bind(labels)
        .fetch_all(&self.pool)
        .await?;
        Ok(recipients)
    }

    /// Recipients by id, deduplicated
    pub async fn recipients_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Recipient>> {
        let recipients = sqlx::query_as::<_, Recipient>(
            "SELECT id, username, email, role FROM users WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(recipients)
    }

    /// Keep only the ids that belong to existing users
    pub async fn existing_ids(&self, ids: &[i64]) -> AppResult<Vec<i64>> {
        let found: Vec<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ANY($1) ORDER BY id")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(found)
    }

    /// Create a new user with an already-hashed password
    pub async fn create(&self, user: &CreateUser, password_hash: &str) -> AppResult<UserRow> {
        let query = format!(
            r#"
            INSERT INTO users (username, password, email, phone, image_url, role, department_id, office_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(&user.username)
            .bind(password_hash)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(&user.image_url)
            .bind(user.role.unwrap_or(Role::User))
            .bind(user.department_id)
            .bind(user.office_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    /// Update an existing user
    pub async fn update(&self, id: i64, user: &UpdateUser, password: Option<String>) -> AppResult<UserRow> {
        let now = Utc::now();

        // Build dynamic update query
        let mut sets = vec!["updated_at = $1".to_string()];
        let mut param_idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, param_idx));
                    param_idx += 1;
                }
            };
        }

        add_field!(user.username, "username");
        add_field!(user.email, "email");
        add_field!(user.phone, "phone");
        add_field!(user.image_url, "image_url");
        add_field!(user.role, "role");
        add_field!(user.department_id, "department_id");
        add_field!(user.office_id, "office_id");

        if password.is_some() {
            sets.push(format!("password = ${}", param_idx));
        }

        let query = format!(
            "UPDATE users SET {} WHERE id = {} RETURNING {}",
            sets.join(", "),
            id,
            USER_COLUMNS
        );

        let mut builder = sqlx::query_as::<_, UserRow>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(user.username);
        bind_field!(user.email);
        bind_field!(user.phone);
        bind_field!(user.image_url);
        bind_field!(user.role);
        bind_field!(user.department_id);
        bind_field!(user.office_id);

        if let Some(ref hash) = password {
            builder = builder.bind(hash);
        }

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Replace a user's password hash
    pub async fn set_password(&self, id: i64, password_hash: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET password = $1, updated_at = NOW() WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }

    /// Delete a user
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }
}
