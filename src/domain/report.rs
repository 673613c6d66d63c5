//! Citizen reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::role::GeoRef;
use crate::domain::status::ReportStatus;

/// A citizen-filed report tied to a full geography chain. Attachments
/// are optional and survive deletion of the report row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Report {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub region_id: Uuid,
    pub zone_id: Uuid,
    pub woreda_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub status: ReportStatus,
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

impl Report {
    pub fn geo_ref(&self) -> GeoRef {
        GeoRef::new(Some(self.region_id), Some(self.zone_id), Some(self.woreda_id))
    }
}

/// Fields for inserting a new report.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub title: String,
    pub description: String,
    pub region_id: Uuid,
    pub zone_id: Uuid,
    pub woreda_id: Uuid,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub created_by: Uuid,
}

/// Owner-editable fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ReportPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}
