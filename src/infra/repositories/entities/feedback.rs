//! Feedback database entity.

use sea_orm::entity::prelude::*;

use crate::domain::feedback::FeedbackKind;
use crate::domain::Feedback;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "feedbacks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    pub kind: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub created_by: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Feedback {
    fn from(model: Model) -> Self {
        Feedback {
            id: model.id,
            email: model.email,
            kind: model.kind.parse().unwrap_or(FeedbackKind::Other),
            message: model.message,
            created_by: model.created_by,
            created_at: model.created_at,
        }
    }
}
