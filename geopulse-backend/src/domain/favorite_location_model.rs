// src/domain/favorite_location_model.rs

use crate::domain::favorite_type::FavoriteType;
use crate::utils::geo::{BoundingBox, Coordinates};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "favorite_locations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: Uuid,
    pub name: String,
    /// POINT or AREA
    pub favorite_type: String,
    #[sea_orm(nullable)]
    pub latitude: Option<f64>,
    #[sea_orm(nullable)]
    pub longitude: Option<f64>,
    #[sea_orm(nullable)]
    pub north_east_lat: Option<f64>,
    #[sea_orm(nullable)]
    pub north_east_lon: Option<f64>,
    #[sea_orm(nullable)]
    pub south_west_lat: Option<f64>,
    #[sea_orm(nullable)]
    pub south_west_lon: Option<f64>,
    #[sea_orm(nullable)]
    pub city: Option<String>,
    #[sea_orm(nullable)]
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Model {
    pub fn kind(&self) -> Option<FavoriteType> {
        FavoriteType::from_str(&self.favorite_type)
    }

    pub fn point(&self) -> Option<Coordinates> {
        match (self.longitude, self.latitude) {
            (Some(lon), Some(lat)) => Some(Coordinates::new(lon, lat)),
            _ => None,
        }
    }

    pub fn area(&self) -> Option<BoundingBox> {
        BoundingBox::new(
            self.south_west_lat?,
            self.north_east_lat?,
            self.south_west_lon?,
            self.north_east_lon?,
        )
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::user_model::Entity",
        from = "Column::UserId",
        to = "crate::domain::user_model::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<crate::domain::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
