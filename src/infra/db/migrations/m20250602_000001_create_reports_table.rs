//! Migration: Create the reports table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reports::Table)
                    .col(ColumnDef::new(Reports::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Reports::Title).string().not_null())
                    .col(ColumnDef::new(Reports::Description).text().not_null())
                    .col(ColumnDef::new(Reports::RegionId).uuid().not_null())
                    .col(ColumnDef::new(Reports::ZoneId).uuid().not_null())
                    .col(ColumnDef::new(Reports::WoredaId).uuid().not_null())
                    .col(ColumnDef::new(Reports::ImageUrl).string().null())
                    .col(ColumnDef::new(Reports::VideoUrl).string().null())
                    .col(ColumnDef::new(Reports::Status).string().not_null())
                    .col(ColumnDef::new(Reports::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(Reports::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Reports::DeletedBy).uuid().null())
                    .col(
                        ColumnDef::new(Reports::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Reports::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reports::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reports_region_id")
                            .from(Reports::Table, Reports::RegionId)
                            .to(Regions::Table, Regions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reports_zone_id")
                            .from(Reports::Table, Reports::ZoneId)
                            .to(Zones::Table, Zones::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reports_woreda_id")
                            .from(Reports::Table, Reports::WoredaId)
                            .to(Woredas::Table, Woredas::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reports_created_by")
                            .from(Reports::Table, Reports::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reports_status")
                    .table(Reports::Table)
                    .col(Reports::Status)
                    .to_owned(),
            )
            .await?;

        // Geographic scoping filters on the region column most often
        manager
            .create_index(
                Index::create()
                    .name("idx_reports_region_id")
                    .table(Reports::Table)
                    .col(Reports::RegionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reports_created_by")
                    .table(Reports::Table)
                    .col(Reports::CreatedBy)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reports::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Reports {
    Table,
    Id,
    Title,
    Description,
    RegionId,
    ZoneId,
    WoredaId,
    ImageUrl,
    VideoUrl,
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
