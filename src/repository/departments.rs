//! Departments repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::department::{Department, DepartmentInput},
};

#[derive(Clone)]
pub struct DepartmentsRepository {
    pool: Pool<Postgres>,
}

impl DepartmentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Department>> {
        let rows = sqlx::query_as::<_, Department>("SELECT * FROM departments ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Department> {
        sqlx::query_as::<_, Department>("SELECT * FROM departments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Department {} not found", id)))
    }

    pub async fn exists(&self, id: i64) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM departments WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    pub async fn create(&self, data: &DepartmentInput) -> AppResult<Department> {
        let row = sqlx::query_as::<_, Department>(
            r#"
            INSERT INTO departments (
                name, description, head_of_department, location, contact_email,
                contact_phone, website, logo_url, establishment_year
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.head_of_department)
        .bind(&data.location)
        .bind(&data.contact_email)
        .bind(&data.contact_phone)
        .bind(&data.website)
        .bind(&data.logo_url)
        .bind(data.establishment_year)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: i64, data: &DepartmentInput) -> AppResult<Department> {
        sqlx::query_as::<_, Department>(
            r#"
            UPDATE departments SET
                name = $1, description = $2, head_of_department = $3, location = $4,
                contact_email = $5, contact_phone = $6, website = $7, logo_url = $8,
                establishment_year = $9, updated_at = NOW()
            WHERE id = $10
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.head_of_department)
        .bind(&data.location)
        .bind(&data.contact_email)
        .bind(&data.contact_phone)
        .bind(&data.website)
        .bind(&data.logo_url)
        .bind(data.establishment_year)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Department {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Department {} not found", id)));
        }
        Ok(())
    }
}
