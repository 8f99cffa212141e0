//! Registrations repository

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::RegistrationStatus,
        registration::{RegisteredUser, RegisteredUserRow, Registration},
    },
};

#[derive(Clone)]
pub struct RegistrationsRepository {
    pool: Pool<Postgres>,
}

impl RegistrationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Registration row for (event, user), whatever its status
    pub async fn find(&self, conn: &mut PgConnection, event_id: i64, user_id: i64) -> AppResult<Option<Registration>> {
        let row = sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE event_id = $1 AND user_id = $2",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
        Ok(row)
    }

    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        event_id: i64,
        user_id: i64,
        notes: Option<&str>,
    ) -> AppResult<Registration> {
        let row = sqlx::query_as::<_, Registration>(
            r#"
            INSERT INTO registrations (event_id, user_id, registration_date, status, attended, notes)
            VALUES ($1, $2, NOW(), $3, FALSE, $4)
            RETURNING *
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .bind(RegistrationStatus::Confirmed)
        .bind(notes)
        .fetch_one(conn)
        .await?;
        Ok(row)
    }

    /// Bring a cancelled registration back to CONFIRMED
    pub async fn reactivate(&self, conn: &mut PgConnection, id: i64, notes: Option<&str>) -> AppResult<Registration> {
        let row = sqlx::query_as::<_, Registration>(
            r#"
            UPDATE registrations
            SET status = $1, registration_date = NOW(), notes = COALESCE($2, notes)
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(RegistrationStatus::Confirmed)
        .bind(notes)
        .bind(id)
        .fetch_one(conn)
        .await?;
        Ok(row)
    }

    pub async fn set_status(&self, conn: &mut PgConnection, id: i64, status: RegistrationStatus) -> AppResult<Registration> {
        let row = sqlx::query_as::<_, Registration>(
            "UPDATE registrations SET status = $1 WHERE id = $2 RETURNING *",
        )
        .bind(status)
        .bind(id)
        .fetch_one(conn)
        .await?;
        Ok(row)
    }

    /// Whether the user holds a CONFIRMED registration
    pub async fn is_registered(&self, event_id: i64, user_id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM registrations WHERE event_id = $1 AND user_id = $2 AND status = $3)",
        )
        .bind(event_id)
        .bind(user_id)
        .bind(RegistrationStatus::Confirmed)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn list_for_event(&self, event_id: i64) -> AppResult<Vec<Registration>> {
        let rows = sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE event_id = $1 ORDER BY registration_date",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<Registration>> {
        let rows = sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE user_id = $1 ORDER BY registration_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Registrations of an event joined with user, department and office
    pub async fn registered_users(&self, event_id: i64) -> AppResult<Vec<RegisteredUser>> {
        let rows = sqlx::query_as::<_, RegisteredUserRow>(
            r#"
            SELECT
                u.id AS user_id, u.username, u.email, u.image_url,
                d.id AS department_id, d.name AS department_name,
                o.id AS office_id, o.name AS office_name,
                r.id AS registration_id, r.registration_date, r.status,
                r.attended, r.check_in_time, r.notes
            FROM registrations r
            JOIN users u ON u.id = r.user_id
            LEFT JOIN departments d ON d.id = u.department_id
            LEFT JOIN offices o ON o.id = u.office_id
            WHERE r.event_id = $1
            ORDER BY r.registration_date
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(RegisteredUser::from).collect())
    }

    pub async fn get_for_event(&self, event_id: i64, registration_id: i64) -> AppResult<Registration> {
        sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE id = $1 AND event_id = $2",
        )
        .bind(registration_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Registration {} not found for event {}",
                registration_id, event_id
            ))
        })
    }

    /// Mark a CONFIRMED registration attended. Returns None when it was
    /// checked in or cancelled since it was read.
    pub async fn check_in(&self, registration_id: i64) -> AppResult<Option<Registration>> {
        let row = sqlx::query_as::<_, Registration>(
            r#"
            UPDATE registrations
            SET attended = TRUE, check_in_time = NOW()
            WHERE id = $1 AND attended = FALSE AND status = $2
            RETURNING *
            "#,
        )
        .bind(registration_id)
        .bind(RegistrationStatus::Confirmed)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed(pool: &Pool<Postgres>) -> (i64, i64) {
        let user_id: i64 = sqlx::query_scalar(
            "INSERT INTO users (username, password, email) VALUES ('attendee', 'x', 'attendee@example.com') RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap();
        let event_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO events (title, start_date, end_date, capacity, status)
            VALUES ('Workshop', NOW() + INTERVAL '1 day', NOW() + INTERVAL '2 days', 5, 'APPROVED')
            RETURNING id
            "#,
        )
        .fetch_one(pool)
        .await
        .unwrap();
        (user_id, event_id)
    }

    async fn confirmed_rows(pool: &Pool<Postgres>, event_id: i64) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status = 'CONFIRMED'")
            .bind(event_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore] // Needs DATABASE_URL
    async fn test_check_in_after_concurrent_cancel_is_refused(pool: Pool<Postgres>) {
        let (user_id, event_id) = seed(&pool).await;
        let repo = RegistrationsRepository::new(pool.clone());
        let mut conn = pool.acquire().await.unwrap();

        let registration = repo.insert(&mut *conn, event_id, user_id, None).await.unwrap();

        // Checked against the row as read before the cancel lands
        let seen = repo.get_for_event(event_id, registration.id).await.unwrap();
        assert!(seen.ensure_can_check_in().is_ok());

        repo.set_status(&mut *conn, registration.id, RegistrationStatus::Cancelled)
            .await
            .unwrap();

        assert!(repo.check_in(registration.id).await.unwrap().is_none());
        assert_eq!(confirmed_rows(&pool, event_id).await, 0);

        let row = repo.get_for_event(event_id, registration.id).await.unwrap();
        assert_eq!(row.status, RegistrationStatus::Cancelled);
        assert!(!row.attended);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore] // Needs DATABASE_URL
    async fn test_check_in_only_once(pool: Pool<Postgres>) {
        let (user_id, event_id) = seed(&pool).await;
        let repo = RegistrationsRepository::new(pool.clone());
        let mut conn = pool.acquire().await.unwrap();

        let registration = repo.insert(&mut *conn, event_id, user_id, None).await.unwrap();

        let checked = repo.check_in(registration.id).await.unwrap().expect("first check-in");
        assert!(checked.attended);
        assert!(checked.check_in_time.is_some());
        assert_eq!(checked.status, RegistrationStatus::Confirmed);

        assert!(repo.check_in(registration.id).await.unwrap().is_none());
    }
}
