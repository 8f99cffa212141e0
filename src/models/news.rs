//! News model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::NewsStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct News {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub author_name: Option<String>,
    pub status: NewsStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewsInput {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub image: Option<String>,
    pub author_name: Option<String>,
    /// Only applied on update
    pub status: Option<NewsStatus>,
}
