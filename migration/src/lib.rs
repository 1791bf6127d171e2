// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// accounts
mod m20250801_000001_create_users_table;

// gps ingestion
mod m20250801_000002_create_gps_source_configs_table;
mod m20250801_000003_create_gps_points_table;

// places and geocoding cache
mod m20250801_000004_create_favorite_locations_table;
mod m20250801_000005_create_reverse_geocoding_locations_table;

// sharing
mod m20250801_000006_create_shared_links_table;
mod m20250801_000007_create_friendship_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // users must exist before every table that references them
            Box::new(m20250801_000001_create_users_table::Migration),
            Box::new(m20250801_000002_create_gps_source_configs_table::Migration),
            Box::new(m20250801_000003_create_gps_points_table::Migration),
            Box::new(m20250801_000004_create_favorite_locations_table::Migration),
            Box::new(m20250801_000005_create_reverse_geocoding_locations_table::Migration),
            Box::new(m20250801_000006_create_shared_links_table::Migration),
            Box::new(m20250801_000007_create_friendship_tables::Migration),
        ]
    }
}
