//! Service order database entity.

use sea_orm::entity::prelude::*;

use crate::domain::status::OrderStatus;
use crate::domain::ServiceOrder;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "service_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub service_type: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub country: String,
    pub region_id: Option<Uuid>,
    pub zone_id: Option<Uuid>,
    pub woreda_id: Option<Uuid>,
    pub manual_region: Option<String>,
    pub manual_zone: Option<String>,
    pub manual_woreda: Option<String>,
    pub document_url: Option<String>,
    pub status: String,
    pub created_by: Uuid,
    pub is_deleted: bool,
    pub deleted_by: Option<Uuid>,
    pub deleted_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ServiceOrder {
    fn from(model: Model) -> Self {
        ServiceOrder {
            id: model.id,
            service_type: model.service_type,
            description: model.description,
            country: model.country,
            region_id: model.region_id,
            zone_id: model.zone_id,
            woreda_id: model.woreda_id,
            manual_region: model.manual_region,
            manual_zone: model.manual_zone,
            manual_woreda: model.manual_woreda,
            document_url: model.document_url,
            status: model.status.parse().unwrap_or(OrderStatus::Pending),
            created_by: model.created_by,
            is_deleted: model.is_deleted,
            deleted_by: model.deleted_by,
            deleted_at: model.deleted_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
