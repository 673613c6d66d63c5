//! Woreda database entity.

use sea_orm::entity::prelude::*;

use crate::domain::Woreda;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "woredas")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub zone_id: Uuid,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Woreda {
    fn from(model: Model) -> Self {
        Woreda {
            id: model.id,
            name: model.name,
            zone_id: model.zone_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
