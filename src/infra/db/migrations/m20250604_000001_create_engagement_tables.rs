//! Migration: Create the feedback, message and news tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Feedback rows are append-only, so no soft-delete block here.
        manager
            .create_table(
                Table::create()
                    .table(Feedbacks::Table)
                    .col(ColumnDef::new(Feedbacks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Feedbacks::Email).string().not_null())
                    .col(ColumnDef::new(Feedbacks::Kind).string().not_null())
                    .col(ColumnDef::new(Feedbacks::Message).text().not_null())
                    .col(ColumnDef::new(Feedbacks::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(Feedbacks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedbacks_created_by")
                            .from(Feedbacks::Table, Feedbacks::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .col(ColumnDef::new(Messages::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Messages::UserId).uuid().not_null())
                    .col(ColumnDef::new(Messages::Sender).string().not_null())
                    .col(ColumnDef::new(Messages::SenderId).uuid().not_null())
                    .col(ColumnDef::new(Messages::Body).text().not_null())
                    .col(
                        ColumnDef::new(Messages::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Messages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_messages_user_id")
                            .from(Messages::Table, Messages::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Threads are read newest-first per user
        manager
            .create_index(
                Index::create()
                    .name("idx_messages_user_id_created_at")
                    .table(Messages::Table)
                    .col(Messages::UserId)
                    .col(Messages::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(News::Table)
                    .col(ColumnDef::new(News::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(News::Title).string().not_null())
                    .col(ColumnDef::new(News::Body).text().not_null())
                    .col(ColumnDef::new(News::ImageUrl).string().null())
                    .col(
                        ColumnDef::new(News::ExpiresAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(News::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(News::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(News::DeletedBy).uuid().null())
                    .col(
                        ColumnDef::new(News::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(News::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(News::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_news_created_by")
                            .from(News::Table, News::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // The expiry sweep scans by cutoff
        manager
            .create_index(
                Index::create()
                    .name("idx_news_expires_at")
                    .table(News::Table)
                    .col(News::ExpiresAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(News::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Feedbacks::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Feedbacks {
    Table,
    Id,
    Email,
    Kind,
    Message,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
enum Messages {
    Table,
    Id,
    UserId,
    Sender,
    SenderId,
    Body,
    IsRead,
    CreatedAt,
}

#[derive(Iden)]
enum News {
    Table,
    Id,
    Title,
    Body,
    ImageUrl,
    ExpiresAt,
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
