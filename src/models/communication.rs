//! Communication (news item, announcement, event post) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::{CommunicationStatus, CommunicationType};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Communication {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub comm_type: CommunicationType,
    pub content: String,
    pub image_url: Option<String>,
    pub author_name: Option<String>,
    pub office_id: i64,
    pub status: CommunicationStatus,
    pub reject_reason: Option<String>,
    pub views: i32,
    pub shares: i32,
    pub author_id: Option<i64>,
    pub approver_id: Option<i64>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create or update a communication
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CommunicationInput {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    #[serde(rename = "type")]
    pub comm_type: CommunicationType,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub image_url: Option<String>,
    pub office_id: i64,
    /// Only honoured for reviewers on update
    pub status: Option<CommunicationStatus>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CommunicationQuery {
    pub status: Option<CommunicationStatus>,
    pub office_id: Option<i64>,
}
