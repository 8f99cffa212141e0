//! Offices repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::office::{Office, OfficeInput},
};

#[derive(Clone)]
pub struct OfficesRepository {
    pool: Pool<Postgres>,
}

impl OfficesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Office>> {
        let rows = sqlx::query_as::<_, Office>("SELECT * FROM offices ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Office> {
        sqlx::query_as::<_, Office>("SELECT * FROM offices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Office {} not found", id)))
    }

    pub async fn exists(&self, id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM offices WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn create(&self, data: &OfficeInput) -> AppResult<Office> {
        let row = sqlx::query_as::<_, Office>(
            r#"
            INSERT INTO offices (
                name, description, office_head, location,
                contact_email, contact_phone, website, logo_url
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.office_head)
        .bind(&data.location)
        .bind(&data.contact_email)
        .bind(&data.contact_phone)
        .bind(&data.website)
        .bind(&data.logo_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: i64, data: &OfficeInput) -> AppResult<Office> {
        sqlx::query_as::<_, Office>(
            r#"
            UPDATE offices SET
                name = $1, description = $2, office_head = $3, location = $4,
                contact_email = $5, contact_phone = $6, website = $7, logo_url = $8,
                updated_at = NOW()
            WHERE id = $9
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.office_head)
        .bind(&data.location)
        .bind(&data.contact_email)
        .bind(&data.contact_phone)
        .bind(&data.website)
        .bind(&data.logo_url)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Office {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM offices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Office {} not found", id)));
        }
        Ok(())
    }
}
