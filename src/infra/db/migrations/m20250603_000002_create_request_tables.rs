//! Migration: Create the partnership and agent request tables.
//!
//! Partial unique indexes hold the one-open-request-per-user rule at
//! the database level; the services give friendlier errors first.

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
                    .table(Partnerships::Table)
                    .col(
                        ColumnDef::new(Partnerships::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Partnerships::OrganizationName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Partnerships::OrganizationType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Partnerships::Proposal).text().not_null())
                    .col(ColumnDef::new(Partnerships::Website).string().null())
                    .col(ColumnDef::new(Partnerships::Status).string().not_null())
                    .col(ColumnDef::new(Partnerships::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(Partnerships::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Partnerships::DeletedBy).uuid().null())
                    .col(
                        ColumnDef::new(Partnerships::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Partnerships::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Partnerships::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_partnerships_created_by")
                            .from(Partnerships::Table, Partnerships::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_partnerships_status")
                    .table(Partnerships::Table)
                    .col(Partnerships::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX uq_partnerships_open_per_user \
                 ON partnerships (created_by) \
                 WHERE status IN ('pending', 'reviewed') AND is_deleted = FALSE",
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AgentRequests::Table)
                    .col(
                        ColumnDef::new(AgentRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AgentRequests::RegionId).uuid().not_null())
                    .col(ColumnDef::new(AgentRequests::ZoneId).uuid().not_null())
                    .col(ColumnDef::new(AgentRequests::WoredaId).uuid().not_null())
                    .col(ColumnDef::new(AgentRequests::Motivation).text().not_null())
                    .col(ColumnDef::new(AgentRequests::Status).string().not_null())
                    .col(ColumnDef::new(AgentRequests::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(AgentRequests::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(AgentRequests::DeletedBy).uuid().null())
                    .col(
                        ColumnDef::new(AgentRequests::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AgentRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AgentRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_agent_requests_region_id")
                            .from(AgentRequests::Table, AgentRequests::RegionId)
                            .to(Regions::Table, Regions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_agent_requests_zone_id")
                            .from(AgentRequests::Table, AgentRequests::ZoneId)
                            .to(Zones::Table, Zones::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_agent_requests_woreda_id")
                            .from(AgentRequests::Table, AgentRequests::WoredaId)
                            .to(Woredas::Table, Woredas::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_agent_requests_created_by")
                            .from(AgentRequests::Table, AgentRequests::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_agent_requests_status")
                    .table(AgentRequests::Table)
                    .col(AgentRequests::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX uq_agent_requests_open_per_user \
                 ON agent_requests (created_by) \
                 WHERE status = 'pending' AND is_deleted = FALSE",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AgentRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Partnerships::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Partnerships {
    Table,
    Id,
    OrganizationName,
    OrganizationType,
    Proposal,
    Website,
    Status,
    CreatedBy,
    IsDeleted,
    DeletedBy,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum AgentRequests {
    Table,
    Id,
    RegionId,
    ZoneId,
    WoredaId,
    Motivation,
    Status,
    CreatedBy,
    IsDeleted,
    DeletedBy,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Regions {
    Table,
    Id,
}

#[derive(Iden)]
enum Zones {
    Table,
    Id,
}

#[derive(Iden)]
enum Woredas {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
