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
                    .table(GpsPoints::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GpsPoints::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GpsPoints::UserId).uuid().not_null())
                    .col(ColumnDef::new(GpsPoints::DeviceId).string_len(100).null())
                    .col(
                        ColumnDef::new(GpsPoints::SourceType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GpsPoints::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GpsPoints::Latitude).double().not_null())
                    .col(ColumnDef::new(GpsPoints::Longitude).double().not_null())
                    .col(ColumnDef::new(GpsPoints::Accuracy).double().null())
                    .col(ColumnDef::new(GpsPoints::Altitude).double().null())
                    .col(ColumnDef::new(GpsPoints::Velocity).double().null())
                    .col(ColumnDef::new(GpsPoints::Battery).double().null())
                    .col(
                        ColumnDef::new(GpsPoints::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gps_points_user_id")
                            .from(GpsPoints::Table, GpsPoints::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // one point per user and instant
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(GpsPoints::Table)
                    .name("idx_gps_points_user_timestamp")
                    .col(GpsPoints::UserId)
                    .col(GpsPoints::Timestamp)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GpsPoints::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GpsPoints {
    Table,
    Id,
    UserId,
    DeviceId,
    SourceType,
    Timestamp,
    Latitude,
    Longitude,
    Accuracy,
    Altitude,
    Velocity,
    Battery,
    CreatedAt,
}
