//! Communications repository

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        communication::{Communication, CommunicationInput, CommunicationQuery},
        enums::CommunicationStatus,
    },
};

#[derive(Clone)]
pub struct CommunicationsRepository {
    pool: Pool<Postgres>,
}

impl CommunicationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &CommunicationQuery) -> AppResult<Vec<Communication>> {
        let rows = sqlx::query_as::<_, Communication>(
            r#"
            SELECT * FROM communications
            WHERE ($1::TEXT IS NULL OR status = $1)
              AND ($2::BIGINT IS NULL OR office_id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(query.status)
        .bind(query.office_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Communication> {
        sqlx::query_as::<_, Communication>("SELECT * FROM communications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Communication {} not found", id)))
    }

    pub async fn create(
        &self,
        data: &CommunicationInput,
        author_id: i64,
        author_name: &str,
    ) -> AppResult<Communication> {
        let row = sqlx::query_as::<_, Communication>(
            r#"
            INSERT INTO communications (
                title, comm_type, content, image_url, author_name, office_id,
                status, views, shares, author_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, 0, 0, $8)
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(data.comm_type)
        .bind(&data.content)
        .bind(&data.image_url)
        .bind(author_name)
        .bind(data.office_id)
        .bind(CommunicationStatus::Pending)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Replace the body fields and the review state
    pub async fn update(
        &self,
        id: i64,
        data: &CommunicationInput,
        status: CommunicationStatus,
        published_at: Option<DateTime<Utc>>,
    ) -> AppResult<Communication> {
        sqlx::query_as::<_, Communication>(
            r#"
            UPDATE communications SET
                title = $1, comm_type = $2, content = $3, image_url = $4, office_id = $5,
                status = $6, published_at = $7, updated_at = NOW()
            WHERE id = $8
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(data.comm_type)
        .bind(&data.content)
        .bind(&data.image_url)
        .bind(data.office_id)
        .bind(status)
        .bind(published_at)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Communication {} not found", id)))
    }

    /// Write the review fields of a communication
    pub async fn set_review_state(
        &self,
        id: i64,
        status: CommunicationStatus,
        reject_reason: Option<&str>,
        published_at: Option<DateTime<Utc>>,
        approver_id: Option<i64>,
    ) -> AppResult<Communication> {
        sqlx::query_as::<_, Communication>(
            r#"
            UPDATE communications SET
                status = $1, reject_reason = $2, published_at = $3,
                approver_id = COALESCE($4, approver_id), updated_at = NOW()
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(reject_reason)
        .bind(published_at)
        .bind(approver_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Communication {} not found", id)))
    }

    /// Increment the share or view counter
    pub async fn increment(&self, id: i64, counter: Counter) -> AppResult<Communication> {
        let column = match counter {
            Counter::Shares => "shares",
            Counter::Views => "views",
        };
        let query = format!(
            "UPDATE communications SET {col} = {col} + 1 WHERE id = $1 RETURNING *",
            col = column
        );
        sqlx::query_as::<_, Communication>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Communication {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM communications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Communication {} not found", id)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Counter {
    Shares,
    Views,
}
