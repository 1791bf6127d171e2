// src/service/geocoding_service.rs

use crate::db::DbPool;
use crate::domain::reverse_geocoding_location_model;
use crate::error::AppResult;
use crate::infrastructure::geocoding::{FormattableGeocodingResult, GeocodingProviderRegistry};
use crate::repository::reverse_geocoding_repository::ReverseGeocodingRepository;
use crate::utils::geo::Coordinates;
use std::sync::Arc;
use tracing::{debug, info};

/// Requests closer than this to a cached request point reuse the cached answer.
pub const CACHE_RADIUS_METERS: f64 = 15.0;

pub struct GeocodingService {
    repo: Arc<ReverseGeocodingRepository>,
    registry: Arc<GeocodingProviderRegistry>,
}

impl GeocodingService {
    pub fn new(db_pool: DbPool, registry: Arc<GeocodingProviderRegistry>) -> Self {
        Self {
            repo: Arc::new(ReverseGeocodingRepository::new(db_pool)),
            registry,
        }
    }

    /// Cached result near `point`, or a fresh provider lookup that is then cached.
    pub async fn get_location(&self, point: Coordinates) -> AppResult<FormattableGeocodingResult> {
        if let Some(cached) = self.repo.find_near(point, CACHE_RADIUS_METERS).await? {
            debug!(id = cached.id, "Reverse geocoding cache hit");
            let cached = self.repo.touch(cached).await?;
            return Ok(to_result(cached));
        }

        let result = self.registry.reverse_geocode(point).await?;
        let stored = self.repo.create(&result).await?;
        info!(
            id = stored.id,
            provider = %stored.provider_name,
            "Reverse geocoding result cached"
        );
        Ok(result)
    }
}

fn to_result(model: reverse_geocoding_location_model::Model) -> FormattableGeocodingResult {
    FormattableGeocodingResult {
        request_coordinates: Coordinates::new(model.request_longitude, model.request_latitude),
        result_coordinates: Coordinates::new(model.result_longitude, model.result_latitude),
        bounding_box: model.bounding_box(),
        formatted_display_name: model.display_name,
        city: model.city,
        country: model.country,
        provider_name: model.provider_name,
    }
}
