//! Migration: Create the jobs and job applications tables.

use sea_orm::ConnectionTrait;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Jobs::Table)
                    .col(ColumnDef::new(Jobs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Jobs::Title).string().not_null())
                    .col(ColumnDef::new(Jobs::Description).text().not_null())
                    .col(ColumnDef::new(Jobs::Requirements).text().null())
                    .col(ColumnDef::new(Jobs::Location).string().null())
                    .col(
                        ColumnDef::new(Jobs::Deadline)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Jobs::Status).string().not_null())
                    .col(ColumnDef::new(Jobs::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(Jobs::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Jobs::DeletedBy).uuid().null())
                    .col(
                        ColumnDef::new(Jobs::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Jobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Jobs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_jobs_created_by")
                            .from(Jobs::Table, Jobs::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_status")
                    .table(Jobs::Table)
                    .col(Jobs::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JobApplications::Table)
                    .col(
                        ColumnDef::new(JobApplications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JobApplications::JobId).uuid().not_null())
                    .col(
                        ColumnDef::new(JobApplications::ApplicantName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobApplications::ApplicantEmail)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(JobApplications::ResumeUrl).string().not_null())
                    .col(ColumnDef::new(JobApplications::CoverLetter).text().null())
                    .col(ColumnDef::new(JobApplications::Status).string().not_null())
                    .col(ColumnDef::new(JobApplications::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(JobApplications::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(JobApplications::DeletedBy).uuid().null())
                    .col(
                        ColumnDef::new(JobApplications::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(JobApplications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobApplications::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_applications_job_id")
                            .from(JobApplications::Table, JobApplications::JobId)
                            .to(Jobs::Table, Jobs::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_applications_created_by")
                            .from(JobApplications::Table, JobApplications::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_job_applications_job_id")
                    .table(JobApplications::Table)
                    .col(JobApplications::JobId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_job_applications_status")
                    .table(JobApplications::Table)
                    .col(JobApplications::Status)
                    .to_owned(),
            )
            .await?;

        // One live application per applicant per job. Partial so a
        // withdrawn (soft-deleted) application frees the slot.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX uq_job_applications_job_id_applicant_email \
                 ON job_applications (job_id, applicant_email) \
                 WHERE is_deleted = FALSE",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobApplications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Jobs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Jobs {
    Table,
    Id,
    Title,
    Description,
    Requirements,
    Location,
    Deadline,
    Status,
    CreatedBy,
    IsDeleted,
    DeletedBy,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum JobApplications {
    Table,
    Id,
    JobId,
    ApplicantName,
    ApplicantEmail,
    ResumeUrl,
    CoverLetter,
    Status,
    CreatedBy,
    IsDeleted,
    DeletedBy,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
