//! Migration: Create the service and customer order tables.
//!
//! Both tables carry the same split location block: structured
//! region/zone/woreda references for domestic orders, free-text fields
//! for orders placed from abroad.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceOrders::Table)
                    .col(
                        ColumnDef::new(ServiceOrders::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ServiceOrders::ServiceType).string().not_null())
                    .col(ColumnDef::new(ServiceOrders::Description).text().not_null())
                    .col(ColumnDef::new(ServiceOrders::Country).string().not_null())
                    .col(ColumnDef::new(ServiceOrders::RegionId).uuid().null())
                    .col(ColumnDef::new(ServiceOrders::ZoneId).uuid().null())
                    .col(ColumnDef::new(ServiceOrders::WoredaId).uuid().null())
                    .col(ColumnDef::new(ServiceOrders::ManualRegion).string().null())
                    .col(ColumnDef::new(ServiceOrders::ManualZone).string().null())
                    .col(ColumnDef::new(ServiceOrders::ManualWoreda).string().null())
                    .col(ColumnDef::new(ServiceOrders::DocumentUrl).string().null())
                    .col(ColumnDef::new(ServiceOrders::Status).string().not_null())
                    .col(ColumnDef::new(ServiceOrders::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(ServiceOrders::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(ServiceOrders::DeletedBy).uuid().null())
                    .col(
                        ColumnDef::new(ServiceOrders::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ServiceOrders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceOrders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_orders_region_id")
                            .from(ServiceOrders::Table, ServiceOrders::RegionId)
                            .to(Regions::Table, Regions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_orders_zone_id")
                            .from(ServiceOrders::Table, ServiceOrders::ZoneId)
                            .to(Zones::Table, Zones::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_orders_woreda_id")
                            .from(ServiceOrders::Table, ServiceOrders::WoredaId)
                            .to(Woredas::Table, Woredas::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_orders_created_by")
                            .from(ServiceOrders::Table, ServiceOrders::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_orders_status")
                    .table(ServiceOrders::Table)
                    .col(ServiceOrders::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_orders_created_by")
                    .table(ServiceOrders::Table)
                    .col(ServiceOrders::CreatedBy)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CustomerOrders::Table)
                    .col(
                        ColumnDef::new(CustomerOrders::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CustomerOrders::Item).string().not_null())
                    .col(ColumnDef::new(CustomerOrders::Quantity).integer().not_null())
                    .col(ColumnDef::new(CustomerOrders::Description).text().not_null())
                    .col(ColumnDef::new(CustomerOrders::Country).string().not_null())
                    .col(ColumnDef::new(CustomerOrders::RegionId).uuid().null())
                    .col(ColumnDef::new(CustomerOrders::ZoneId).uuid().null())
                    .col(ColumnDef::new(CustomerOrders::WoredaId).uuid().null())
                    .col(ColumnDef::new(CustomerOrders::ManualRegion).string().null())
                    .col(ColumnDef::new(CustomerOrders::ManualZone).string().null())
                    .col(ColumnDef::new(CustomerOrders::ManualWoreda).string().null())
                    .col(ColumnDef::new(CustomerOrders::DocumentUrl).string().null())
                    .col(ColumnDef::new(CustomerOrders::Status).string().not_null())
                    .col(ColumnDef::new(CustomerOrders::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(CustomerOrders::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(CustomerOrders::DeletedBy).uuid().null())
                    .col(
                        ColumnDef::new(CustomerOrders::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CustomerOrders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomerOrders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_orders_region_id")
                            .from(CustomerOrders::Table, CustomerOrders::RegionId)
                            .to(Regions::Table, Regions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_orders_zone_id")
                            .from(CustomerOrders::Table, CustomerOrders::ZoneId)
                            .to(Zones::Table, Zones::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_orders_woreda_id")
                            .from(CustomerOrders::Table, CustomerOrders::WoredaId)
                            .to(Woredas::Table, Woredas::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_orders_created_by")
                            .from(CustomerOrders::Table, CustomerOrders::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_customer_orders_status")
                    .table(CustomerOrders::Table)
                    .col(CustomerOrders::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_customer_orders_created_by")
                    .table(CustomerOrders::Table)
                    .col(CustomerOrders::CreatedBy)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CustomerOrders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ServiceOrders::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ServiceOrders {
    Table,
    Id,
    ServiceType,
    Description,
    Country,
    RegionId,
    ZoneId,
    WoredaId,
    ManualRegion,
    ManualZone,
    ManualWoreda,
    DocumentUrl,
    Status,
    CreatedBy,
    IsDeleted,
    DeletedBy,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CustomerOrders {
    Table,
    Id,
    Item,
    Quantity,
    Description,
    Country,
    RegionId,
    ZoneId,
    WoredaId,
    ManualRegion,
    ManualZone,
    ManualWoreda,
    DocumentUrl,
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
