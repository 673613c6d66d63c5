//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20250601_000001_create_geography_tables;
mod m20250601_000002_create_users_table;
mod m20250601_000003_create_refresh_tokens_table;
mod m20250602_000001_create_reports_table;
mod m20250602_000002_create_order_tables;
mod m20250603_000001_create_job_tables;
mod m20250603_000002_create_request_tables;
mod m20250604_000001_create_engagement_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_geography_tables::Migration),
            Box::new(m20250601_000002_create_users_table::Migration),
            Box::new(m20250601_000003_create_refresh_tokens_table::Migration),
            Box::new(m20250602_000001_create_reports_table::Migration),
            Box::new(m20250602_000002_create_order_tables::Migration),
            Box::new(m20250603_000001_create_job_tables::Migration),
            Box::new(m20250603_000002_create_request_tables::Migration),
            Box::new(m20250604_000001_create_engagement_tables::Migration),
        ]
    }
}
