//! Message database entity.

use sea_orm::entity::prelude::*;

use crate::domain::{Message, SenderKind};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub sender: String,
    pub sender_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub is_read: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Message {
    fn from(model: Model) -> Self {
        Message {
            id: model.id,
            user_id: model.user_id,
            sender: SenderKind::from(model.sender.as_str()),
            sender_id: model.sender_id,
            body: model.body,
            is_read: model.is_read,
            created_at: model.created_at,
        }
    }
}
