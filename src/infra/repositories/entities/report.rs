//! Report database entity.

use sea_orm::entity::prelude::*;

use crate::domain::status::ReportStatus;
use crate::domain::Report;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub region_id: Uuid,
    pub zone_id: Uuid,
    pub woreda_id: Uuid,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
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

impl From<Model> for Report {
    fn from(model: Model) -> Self {
        Report {
            id: model.id,
            title: model.title,
            description: model.description,
            region_id: model.region_id,
            zone_id: model.zone_id,
            woreda_id: model.woreda_id,
            image_url: model.image_url,
            video_url: model.video_url,
            status: model.status.parse().unwrap_or(ReportStatus::Pending),
            created_by: model.created_by,
            is_deleted: model.is_deleted,
            deleted_by: model.deleted_by,
            deleted_at: model.deleted_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
