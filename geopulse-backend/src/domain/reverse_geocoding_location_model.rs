// src/domain/reverse_geocoding_location_model.rs

use crate::utils::geo::BoundingBox;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cached reverse geocoding answer for one requested coordinate
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reverse_geocoding_locations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub request_latitude: f64,
    pub request_longitude: f64,
    pub result_latitude: f64,
    pub result_longitude: f64,
    #[sea_orm(nullable)]
    pub bbox_south: Option<f64>,
    #[sea_orm(nullable)]
    pub bbox_north: Option<f64>,
    #[sea_orm(nullable)]
    pub bbox_west: Option<f64>,
    #[sea_orm(nullable)]
    pub bbox_east: Option<f64>,
    pub display_name: String,
    #[sea_orm(nullable)]
    pub city: Option<String>,
    #[sea_orm(nullable)]
    pub country: Option<String>,
    pub provider_name: String,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
}

impl Model {
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::new(
            self.bbox_south?,
            self.bbox_north?,
            self.bbox_west?,
            self.bbox_east?,
        )
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
