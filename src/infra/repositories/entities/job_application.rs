//! Job application database entity.

use sea_orm::entity::prelude::*;

use crate::domain::status::ApplicationStatus;
use crate::domain::JobApplication;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "job_applications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_name: String,
    pub applicant_email: String,
    pub resume_url: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub cover_letter: Option<String>,
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

impl From<Model> for JobApplication {
    fn from(model: Model) -> Self {
        JobApplication {
            id: model.id,
            job_id: model.job_id,
            applicant_name: model.applicant_name,
            applicant_email: model.applicant_email,
            resume_url: model.resume_url,
            cover_letter: model.cover_letter,
            status: model.status.parse().unwrap_or(ApplicationStatus::Applied),
            created_by: model.created_by,
            is_deleted: model.is_deleted,
            deleted_by: model.deleted_by,
            deleted_at: model.deleted_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
