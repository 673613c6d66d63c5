//! Migration: Create the region/zone/woreda hierarchy.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Regions::Table)
                    .col(ColumnDef::new(Regions::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Regions::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Regions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Regions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Zones::Table)
                    .col(ColumnDef::new(Zones::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Zones::Name).string().not_null())
                    .col(ColumnDef::new(Zones::RegionId).uuid().not_null())
                    .col(
                        ColumnDef::new(Zones::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Zones::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_zones_region_id")
                            .from(Zones::Table, Zones::RegionId)
                            .to(Regions::Table, Regions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Zone names only need to be unique within their region
        manager
            .create_index(
                Index::create()
                    .name("uq_zones_region_id_name")
                    .table(Zones::Table)
                    .col(Zones::RegionId)
                    .col(Zones::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Woredas::Table)
                    .col(ColumnDef::new(Woredas::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Woredas::Name).string().not_null())
                    .col(ColumnDef::new(Woredas::ZoneId).uuid().not_null())
                    .col(
                        ColumnDef::new(Woredas::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Woredas::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_woredas_zone_id")
                            .from(Woredas::Table, Woredas::ZoneId)
                            .to(Zones::Table, Zones::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_woredas_zone_id_name")
                    .table(Woredas::Table)
                    .col(Woredas::ZoneId)
                    .col(Woredas::Name)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Woredas::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Zones::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Regions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Regions {
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Zones {
    Table,
    Id,
    Name,
    RegionId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Woredas {
    Table,
    Id,
    Name,
    ZoneId,
    CreatedAt,
    UpdatedAt,
}
