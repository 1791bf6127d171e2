// src/service/favorite_service.rs

use crate::api::dto::favorite_dto::{
    AddAreaFavoriteDto, AddPointFavoriteDto, EditFavoriteDto, FavoriteDto, FavoriteLocationsDto,
};
use crate::db::DbPool;
use crate::domain::favorite_location_model;
use crate::error::{AppError, AppResult};
use crate::repository::favorite_repository::{FavoriteRepository, NewFavorite, NewFavoriteShape};
use crate::service::geocoding_service::GeocodingService;
use crate::utils::geo::Coordinates;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

pub struct FavoriteService {
    repo: Arc<FavoriteRepository>,
    geocoding_service: Arc<GeocodingService>,
}

impl FavoriteService {
    pub fn new(db_pool: DbPool, geocoding_service: Arc<GeocodingService>) -> Self {
        Self {
            repo: Arc::new(FavoriteRepository::new(db_pool)),
            geocoding_service,
        }
    }

    pub async fn get_favorites(
        &self,
        user_id: Uuid,
        search: Option<&str>,
    ) -> AppResult<FavoriteLocationsDto> {
        let favorites = self.repo.find_all_for_user(user_id, search).await?;
        Ok(favorites.into_iter().collect())
    }

    pub async fn add_point(
        &self,
        user_id: Uuid,
        payload: AddPointFavoriteDto,
    ) -> AppResult<FavoriteDto> {
        payload.validate()?;

        // city/country are best effort
        let (city, country) = match self
            .geocoding_service
            .get_location(Coordinates::new(payload.lon, payload.lat))
            .await
        {
            Ok(location) => (location.city, location.country),
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Could not geocode favorite point");
                (None, None)
            }
        };

        let favorite = self
            .repo
            .create(NewFavorite {
                user_id,
                name: payload.name.trim().to_string(),
                shape: NewFavoriteShape::Point {
                    latitude: payload.lat,
                    longitude: payload.lon,
                },
                city,
                country,
            })
            .await?;

        info!(user_id = %user_id, favorite_id = favorite.id, "Point favorite added");
        to_dto(favorite)
    }

    pub async fn add_area(
        &self,
        user_id: Uuid,
        payload: AddAreaFavoriteDto,
    ) -> AppResult<FavoriteDto> {
        payload.validate()?;
        if payload.north_east_lat <= payload.south_west_lat {
            return Err(AppError::BadRequest(
                "North-east corner must be north of the south-west corner".to_string(),
            ));
        }

        let favorite = self
            .repo
            .create(NewFavorite {
                user_id,
                name: payload.name.trim().to_string(),
                shape: NewFavoriteShape::Area {
                    north_east_lat: payload.north_east_lat,
                    north_east_lon: payload.north_east_lon,
                    south_west_lat: payload.south_west_lat,
                    south_west_lon: payload.south_west_lon,
                },
                city: None,
                country: None,
            })
            .await?;

        info!(user_id = %user_id, favorite_id = favorite.id, "Area favorite added");
        to_dto(favorite)
    }

    pub async fn rename(
        &self,
        user_id: Uuid,
        id: i64,
        payload: EditFavoriteDto,
    ) -> AppResult<FavoriteDto> {
        payload.validate()?;

        let favorite = self
            .repo
            .rename(user_id, id, payload.name.trim().to_string())
            .await?
            .ok_or_else(|| AppError::NotFound("Favorite location not found".to_string()))?;

        info!(user_id = %user_id, favorite_id = id, "Favorite renamed");
        to_dto(favorite)
    }

    pub async fn delete(&self, user_id: Uuid, id: i64) -> AppResult<()> {
        if self.repo.delete_for_user(user_id, id).await? == 0 {
            return Err(AppError::NotFound("Favorite location not found".to_string()));
        }
        info!(user_id = %user_id, favorite_id = id, "Favorite deleted");
        Ok(())
    }
}

fn to_dto(model: favorite_location_model::Model) -> AppResult<FavoriteDto> {
    let id = model.id;
    FavoriteDto::from_model(model).ok_or_else(|| {
        AppError::InternalServerError(format!("Favorite {} has inconsistent coordinates", id))
    })
}
