use sea_orm_migration::prelude::*;

use crate::m20250801_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SharedLinks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SharedLinks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(SharedLinks::UserId).uuid().not_null())
                    .col(ColumnDef::new(SharedLinks::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(SharedLinks::ExpiresAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SharedLinks::PasswordHash)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SharedLinks::ShowHistory)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SharedLinks::HistoryHours)
                            .integer()
                            .not_null()
                            .default(24),
                    )
                    .col(
                        ColumnDef::new(SharedLinks::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SharedLinks::ViewCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SharedLinks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shared_links_user_id")
                            .from(SharedLinks::Table, SharedLinks::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(SharedLinks::Table)
                    .name("idx_shared_links_user_id")
                    .col(SharedLinks::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SharedLinks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SharedLinks {
    Table,
    Id,
    UserId,
    Name,
    ExpiresAt,
    PasswordHash,
    ShowHistory,
    HistoryHours,
    IsActive,
    ViewCount,
    CreatedAt,
}
