//! News items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// An admin-published news item. Items past their expiry stop showing
/// in public listings and are swept into the deleted state by the
/// maintenance command; the attached image is removed from storage on
/// deletion.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct News {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    #[serde(skip_serializing)]
    pub is_deleted: bool,
    #[serde(skip_serializing)]
    pub deleted_by: Option<Uuid>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNews {
    pub title: String,
    pub body: String,
    pub image_url: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct NewsPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub image_url: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}
