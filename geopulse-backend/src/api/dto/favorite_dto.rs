// src/api/dto/favorite_dto.rs

use crate::domain::favorite_location_model;
use crate::domain::favorite_type::FavoriteType;
use crate::utils::validation::validate_not_blank;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const FAVORITE_NAME_MAX_LENGTH: u64 = 100;

/// Rename request for a favorite
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EditFavoriteDto {
    #[validate(
        custom(function = validate_not_blank, message = "Favorite name cannot be empty"),
        length(max = FAVORITE_NAME_MAX_LENGTH, message = "Favorite name cannot exceed 100 characters")
    )]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddPointFavoriteDto {
    #[validate(
        custom(function = validate_not_blank, message = "Favorite name cannot be empty"),
        length(max = FAVORITE_NAME_MAX_LENGTH, message = "Favorite name cannot exceed 100 characters")
    )]
    pub name: String,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub lon: f64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddAreaFavoriteDto {
    #[validate(
        custom(function = validate_not_blank, message = "Favorite name cannot be empty"),
        length(max = FAVORITE_NAME_MAX_LENGTH, message = "Favorite name cannot exceed 100 characters")
    )]
    pub name: String,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub north_east_lat: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub north_east_lon: f64,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub south_west_lat: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub south_west_lon: f64,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct FavoriteSearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritePointDto {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FavoriteType,
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteAreaDto {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FavoriteType,
    pub north_east_lat: f64,
    pub north_east_lon: f64,
    pub south_west_lat: f64,
    pub south_west_lon: f64,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FavoriteDto {
    Point(FavoritePointDto),
    Area(FavoriteAreaDto),
}

impl FavoriteDto {
    /// `None` for rows whose type or coordinates are inconsistent
    pub fn from_model(model: favorite_location_model::Model) -> Option<Self> {
        match model.kind()? {
            FavoriteType::Point => {
                let point = model.point()?;
                Some(Self::Point(FavoritePointDto {
                    id: model.id,
                    name: model.name,
                    kind: FavoriteType::Point,
                    latitude: point.latitude,
                    longitude: point.longitude,
                    city: model.city,
                    country: model.country,
                }))
            }
            FavoriteType::Area => Some(Self::Area(FavoriteAreaDto {
                id: model.id,
                name: model.name,
                kind: FavoriteType::Area,
                north_east_lat: model.north_east_lat?,
                north_east_lon: model.north_east_lon?,
                south_west_lat: model.south_west_lat?,
                south_west_lon: model.south_west_lon?,
                city: model.city,
                country: model.country,
            })),
        }
    }
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct FavoriteLocationsDto {
    pub points: Vec<FavoritePointDto>,
    pub areas: Vec<FavoriteAreaDto>,
}

impl FromIterator<favorite_location_model::Model> for FavoriteLocationsDto {
    fn from_iter<I: IntoIterator<Item = favorite_location_model::Model>>(iter: I) -> Self {
        let mut locations = Self::default();
        for favorite in iter.into_iter().filter_map(FavoriteDto::from_model) {
            match favorite {
                FavoriteDto::Point(point) => locations.points.push(point),
                FavoriteDto::Area(area) => locations.areas.push(area),
            }
        }
        locations
    }
}
