//! Partnership requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::status::PartnershipStatus;

/// An organization's request to partner with the platform. A user may
/// hold at most one request that has not reached a terminal status.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Partnership {
    pub id: Uuid,
    pub organization_name: String,
    pub organization_type: String,
    pub proposal: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub status: PartnershipStatus,
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
pub struct NewPartnership {
    pub organization_name: String,
    pub organization_type: String,
    pub proposal: String,
    pub website: Option<String>,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct PartnershipPatch {
    pub organization_name: Option<String>,
    pub organization_type: Option<String>,
    pub proposal: Option<String>,
    pub website: Option<String>,
}
