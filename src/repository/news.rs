//! News repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::NewsStatus,
        news::{News, NewsInput},
    },
};

#[derive(Clone)]
pub struct NewsRepository {
    pool: Pool<Postgres>,
}

impl NewsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Newest first, optionally restricted to one status
    pub async fn list(&self, status: Option<NewsStatus>) -> AppResult<Vec<News>> {
        let rows = sqlx::query_as::<_, News>(
            "SELECT * FROM news WHERE ($1::TEXT IS NULL OR status = $1) ORDER BY created_at DESC",
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<News> {
        sqlx::query_as::<_, News>("SELECT * FROM news WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("News {} not found", id)))
    }

    pub async fn create(&self, data: &NewsInput) -> AppResult<News> {
        let row = sqlx::query_as::<_, News>(
            r#"
            INSERT INTO news (title, content, image, author_name, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.content)
        .bind(&data.image)
        .bind(&data.author_name)
        .bind(NewsStatus::Active)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: i64, data: &NewsInput) -> AppResult<News> {
        sqlx::query_as::<_, News>(
            r#"
            UPDATE news SET
                title = $1, content = $2, image = $3, author_name = $4,
                status = COALESCE($5, status), updated_at = NOW()
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.content)
        .bind(&data.image)
        .bind(&data.author_name)
        .bind(data.status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("News {} not found", id)))
    }

    /// Soft delete: the row stays, flagged INACTIVE
    pub async fn deactivate(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("UPDATE news SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(NewsStatus::Inactive)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("News {} not found", id)));
        }
        Ok(())
    }
}
