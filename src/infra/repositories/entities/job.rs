//! Job posting database entity.

use sea_orm::entity::prelude::*;

use crate::domain::status::JobStatus;
use crate::domain::Job;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub deadline: Option<DateTimeUtc>,
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

impl From<Model> for Job {
    fn from(model: Model) -> Self {
        Job {
            id: model.id,
            title: model.title,
            description: model.description,
            requirements: model.requirements,
            location: model.location,
            deadline: model.deadline,
            status: model.status.parse().unwrap_or(JobStatus::Closed),
            created_by: model.created_by,
            is_deleted: model.is_deleted,
            deleted_by: model.deleted_by,
            deleted_at: model.deleted_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
