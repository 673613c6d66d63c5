//! News database entity.

use sea_orm::entity::prelude::*;

use crate::domain::News;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "news")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub image_url: Option<String>,
    pub expires_at: Option<DateTimeUtc>,
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

impl From<Model> for News {
    fn from(model: Model) -> Self {
        News {
            id: model.id,
            title: model.title,
            body: model.body,
            image_url: model.image_url,
            expires_at: model.expires_at,
            created_by: model.created_by,
            is_deleted: model.is_deleted,
            deleted_by: model.deleted_by,
            deleted_at: model.deleted_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
