//! Agent requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::status::AgentStatus;

/// A user's request to serve as a field agent in a specific woreda.
/// Approval promotes the requesting account to the agent role. A user
/// may hold at most one request that has not reached a terminal status.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AgentRequest {
    pub id: Uuid,
    pub region_id: Uuid,
    pub zone_id: Uuid,
    pub woreda_id: Uuid,
    pub motivation: String,
    pub status: AgentStatus,
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
pub struct NewAgentRequest {
    pub region_id: Uuid,
    pub zone_id: Uuid,
    pub woreda_id: Uuid,
    pub motivation: String,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct AgentRequestPatch {
    pub region_id: Option<Uuid>,
    pub zone_id: Option<Uuid>,
    pub woreda_id: Option<Uuid>,
    pub motivation: Option<String>,
}
