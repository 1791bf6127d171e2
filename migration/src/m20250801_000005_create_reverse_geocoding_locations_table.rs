use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReverseGeocodingLocations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReverseGeocodingLocations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReverseGeocodingLocations::RequestLatitude)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReverseGeocodingLocations::RequestLongitude)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReverseGeocodingLocations::ResultLatitude)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReverseGeocodingLocations::ResultLongitude)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReverseGeocodingLocations::BboxSouth)
                            .double()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ReverseGeocodingLocations::BboxNorth)
                            .double()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ReverseGeocodingLocations::BboxWest)
                            .double()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ReverseGeocodingLocations::BboxEast)
                            .double()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ReverseGeocodingLocations::DisplayName)
                            .string_len(1000)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReverseGeocodingLocations::City)
                            .string_len(200)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ReverseGeocodingLocations::Country)
                            .string_len(200)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ReverseGeocodingLocations::ProviderName)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReverseGeocodingLocations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ReverseGeocodingLocations::LastAccessedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // cache lookups filter on a small lat/lon window first
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(ReverseGeocodingLocations::Table)
                    .name("idx_reverse_geocoding_request_coords")
                    .col(ReverseGeocodingLocations::RequestLatitude)
                    .col(ReverseGeocodingLocations::RequestLongitude)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(ReverseGeocodingLocations::Table)
                    .name("idx_reverse_geocoding_provider_name")
                    .col(ReverseGeocodingLocations::ProviderName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(ReverseGeocodingLocations::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum ReverseGeocodingLocations {
    Table,
    Id,
    RequestLatitude,
    RequestLongitude,
    ResultLatitude,
    ResultLongitude,
    BboxSouth,
    BboxNorth,
    BboxWest,
    BboxEast,
    DisplayName,
    City,
    Country,
    ProviderName,
    CreatedAt,
    LastAccessedAt,
}
