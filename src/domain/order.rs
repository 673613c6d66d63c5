//! Service orders and customer orders.
//!
//! The two order families share the same lifecycle and the same
//! country-driven location rule; they differ only in payload. Orders
//! inside the covered country carry a structured geography chain,
//! orders abroad carry free-text location fields instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::role::GeoRef;
use crate::domain::status::OrderStatus;

/// A request for one of the organization's services.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceOrder {
    pub id: Uuid,
    pub service_type: String,
    pub description: String,
    pub country: String,
    pub region_id: Option<Uuid>,
    pub zone_id: Option<Uuid>,
    pub woreda_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_woreda: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
    pub status: OrderStatus,
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

/// An order placed for goods on behalf of a customer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerOrder {
    pub id: Uuid,
    pub item: String,
    pub quantity: i32,
    pub description: String,
    pub country: String,
    pub region_id: Option<Uuid>,
    pub zone_id: Option<Uuid>,
    pub woreda_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_woreda: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
    pub status: OrderStatus,
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

impl ServiceOrder {
    pub fn geo_ref(&self) -> GeoRef {
        GeoRef::new(self.region_id, self.zone_id, self.woreda_id)
    }
}

impl CustomerOrder {
    pub fn geo_ref(&self) -> GeoRef {
        GeoRef::new(self.region_id, self.zone_id, self.woreda_id)
    }
}

/// Fields for inserting a new service order. The location has already
/// been resolved through the country rule.
#[derive(Debug, Clone)]
pub struct NewServiceOrder {
    pub service_type: String,
    pub description: String,
    pub country: String,
    pub location: crate::domain::geography::OrderLocation,
    pub document_url: Option<String>,
    pub created_by: Uuid,
}

#[derive(Debug, Clone)]
pub struct NewCustomerOrder {
    pub item: String,
    pub quantity: i32,
    pub description: String,
    pub country: String,
    pub location: crate::domain::geography::OrderLocation,
    pub document_url: Option<String>,
    pub created_by: Uuid,
}

/// Owner-editable fields of a service order.
#[derive(Debug, Clone, Default)]
pub struct ServiceOrderPatch {
    pub service_type: Option<String>,
    pub description: Option<String>,
    pub document_url: Option<String>,
}

/// Owner-editable fields of a customer order.
#[derive(Debug, Clone, Default)]
pub struct CustomerOrderPatch {
    pub item: Option<String>,
    pub quantity: Option<i32>,
    pub description: Option<String>,
    pub document_url: Option<String>,
}
