//! Home page slider model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Slider {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub display_order: i32,
    /// Shown on the home page when true
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SliderInput {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub display_order: Option<i32>,
    pub status: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SliderStatusRequest {
    pub status: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SliderOrderRequest {
    pub display_order: i32,
}
