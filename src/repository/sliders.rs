//! Sliders repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::slider::{Slider, SliderInput},
};

#[derive(Clone)]
pub struct SlidersRepository {
    pool: Pool<Postgres>,
}

impl SlidersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// All sliders, or only the active ones, by display order
    pub async fn list(&self, active_only: bool) -> AppResult<Vec<Slider>> {
        let rows = sqlx::query_as::<_, Slider>(
            "SELECT * FROM sliders WHERE ($1 = FALSE OR status = TRUE) ORDER BY display_order, id",
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Slider> {
        sqlx::query_as::<_, Slider>("SELECT * FROM sliders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Slider {} not found", id)))
    }

    pub async fn create(&self, data: &SliderInput) -> AppResult<Slider> {
        let row = sqlx::query_as::<_, Slider>(
            r#"
            INSERT INTO sliders (title, description, image, link, display_order, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.image)
        .bind(&data.link)
        .bind(data.display_order.unwrap_or(0))
        .bind(data.status.unwrap_or(true))
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: i64, data: &SliderInput) -> AppResult<Slider> {
        sqlx::query_as::<_, Slider>(
            r#"
            UPDATE sliders SET
                title = $1, description = $2, image = $3, link = $4,
                display_order = COALESCE($5, display_order),
                status = COALESCE($6, status),
                updated_at = NOW()
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.image)
        .bind(&data.link)
        .bind(data.display_order)
        .bind(data.status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Slider {} not found", id)))
    }

    pub async fn set_status(&self, id: i64, status: bool) -> AppResult<Slider> {
        sqlx::query_as::<_, Slider>(
            "UPDATE sliders SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Slider {} not found", id)))
    }

    pub async fn set_order(&self, id: i64, display_order: i32) -> AppResult<Slider> {
        sqlx::query_as::<_, Slider>(
            "UPDATE sliders SET display_order = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(display_order)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Slider {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM sliders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Slider {} not found", id)));
        }
        Ok(())
    }
}
