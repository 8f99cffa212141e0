//! Department model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub head_of_department: Option<String>,
    pub location: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub establishment_year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create or replace a department
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DepartmentInput {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    pub description: Option<String>,
    pub head_of_department: Option<String>,
    pub location: Option<String>,
    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    #[validate(range(min = 1800, max = 2200, message = "Invalid establishment year"))]
    pub establishment_year: Option<i32>,
}
