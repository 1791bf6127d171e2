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
                    .table(FavoriteLocations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FavoriteLocations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FavoriteLocations::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(FavoriteLocations::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FavoriteLocations::FavoriteType)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(ColumnDef::new(FavoriteLocations::Latitude).double().null())
                    .col(ColumnDef::new(FavoriteLocations::Longitude).double().null())
                    .col(
                        ColumnDef::new(FavoriteLocations::NorthEastLat)
                            .double()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(FavoriteLocations::NorthEastLon)
                            .double()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(FavoriteLocations::SouthWestLat)
                            .double()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(FavoriteLocations::SouthWestLon)
                            .double()
                            .null(),
                    )
                    .col(ColumnDef::new(FavoriteLocations::City).string_len(200).null())
                    .col(
                        ColumnDef::new(FavoriteLocations::Country)
                            .string_len(200)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(FavoriteLocations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_locations_user_id")
                            .from(FavoriteLocations::Table, FavoriteLocations::UserId)
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
                    .table(FavoriteLocations::Table)
                    .name("idx_favorite_locations_user_id")
                    .col(FavoriteLocations::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FavoriteLocations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum FavoriteLocations {
    Table,
    Id,
    UserId,
    Name,
    FavoriteType,
    Latitude,
    Longitude,
    NorthEastLat,
    NorthEastLon,
    SouthWestLat,
    SouthWestLon,
    City,
    Country,
    CreatedAt,
}
