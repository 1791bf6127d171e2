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
                    .table(GpsSourceConfigs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GpsSourceConfigs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GpsSourceConfigs::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(GpsSourceConfigs::SourceType)
                            .string_len(20)
                            .not_null(),
                    )
                    // OwnTracks logins and Overland tokens must map to exactly one user
                    .col(
                        ColumnDef::new(GpsSourceConfigs::Username)
                            .string_len(100)
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(GpsSourceConfigs::PasswordHash)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(GpsSourceConfigs::Token)
                            .string_len(100)
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(GpsSourceConfigs::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(GpsSourceConfigs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gps_source_configs_user_id")
                            .from(GpsSourceConfigs::Table, GpsSourceConfigs::UserId)
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
                    .table(GpsSourceConfigs::Table)
                    .name("idx_gps_source_configs_user_id")
                    .col(GpsSourceConfigs::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GpsSourceConfigs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GpsSourceConfigs {
    Table,
    Id,
    UserId,
    SourceType,
    Username,
    PasswordHash,
    Token,
    Active,
    CreatedAt,
}
