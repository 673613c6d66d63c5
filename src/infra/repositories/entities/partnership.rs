//! Partnership request database entity.

use sea_orm::entity::prelude::*;

use crate::domain::status::PartnershipStatus;
use crate::domain::Partnership;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "partnerships")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_name: String,
    pub organization_type: String,
    #[sea_orm(column_type = "Text")]
    pub proposal: String,
    pub website: Option<String>,
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

impl From<Model> for Partnership {
    fn from(model: Model) -> Self {
        Partnership {
            id: model.id,
            organization_name: model.organization_name,
            organization_type: model.organization_type,
            proposal: model.proposal,
            website: model.website,
            status: model.status.parse().unwrap_or(PartnershipStatus::Pending),
            created_by: model.created_by,
            is_deleted: model.is_deleted,
            deleted_by: model.deleted_by,
            deleted_at: model.deleted_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
