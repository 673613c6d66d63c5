//! Zone database entity.

use sea_orm::entity::prelude::*;

use crate::domain::Zone;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "zones")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub region_id: Uuid,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Zone {
    fn from(model: Model) -> Self {
        Zone {
            id: model.id,
            name: model.name,
            region_id: model.region_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
