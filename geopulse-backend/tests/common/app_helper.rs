// tests/common/app_helper.rs

use async_trait::async_trait;
use axum::Router;
use geopulse_backend::{
    api::{create_router, AppState},
    config::AppConfig,
    db::{create_db_pool, run_migrations, DbPool},
    infrastructure::geocoding::{
        FormattableGeocodingResult, GeocodingError, GeocodingProvider, GeocodingProviderRegistry,
    },
    utils::geo::Coordinates,
};
use std::sync::Arc;

use crate::common;

/// Provider answering every lookup with a fixed place
pub struct StubProvider {
    pub name: &'static str,
    pub city: &'static str,
    pub country: &'static str,
}

#[async_trait]
impl GeocodingProvider for StubProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn reverse_geocode(
        &self,
        point: Coordinates,
    ) -> Result<FormattableGeocodingResult, GeocodingError> {
        Ok(FormattableGeocodingResult {
            request_coordinates: point,
            result_coordinates: point,
            bounding_box: None,
            formatted_display_name: format!("{} Street, {}", self.name, self.city),
            city: Some(self.city.to_string()),
            country: Some(self.country.to_string()),
            provider_name: self.name.to_string(),
        })
    }
}

/// Provider that is unavailable for every point north of `fails_north_of`
pub struct FlakyProvider {
    pub inner: StubProvider,
    pub fails_north_of: f64,
}

#[async_trait]
impl GeocodingProvider for FlakyProvider {
    fn name(&self) -> &str {
        self.inner.name
    }

    async fn reverse_geocode(
        &self,
        point: Coordinates,
    ) -> Result<FormattableGeocodingResult, GeocodingError> {
        if point.latitude > self.fails_north_of {
            return Err(GeocodingError::Unavailable("rate limited".to_string()));
        }
        self.inner.reverse_geocode(point).await
    }
}

pub fn stub_registry() -> Arc<GeocodingProviderRegistry> {
    Arc::new(GeocodingProviderRegistry::new(
        vec![
            Arc::new(StubProvider {
                name: "Nominatim",
                city: "Kyiv",
                country: "Ukraine",
            }),
            Arc::new(StubProvider {
                name: "Photon",
                city: "Kyiv City",
                country: "Ukraine",
            }),
        ],
        "Nominatim",
        Some("Photon".to_string()),
    ))
}

/// Same providers as [`stub_registry`], but Photon fails north of `fails_north_of`
pub fn flaky_registry(fails_north_of: f64) -> Arc<GeocodingProviderRegistry> {
    Arc::new(GeocodingProviderRegistry::new(
        vec![
            Arc::new(StubProvider {
                name: "Nominatim",
                city: "Kyiv",
                country: "Ukraine",
            }),
            Arc::new(FlakyProvider {
                inner: StubProvider {
                    name: "Photon",
                    city: "Kyiv City",
                    country: "Ukraine",
                },
                fails_north_of,
            }),
        ],
        "Nominatim",
        Some("Photon".to_string()),
    ))
}

/// In-memory SQLite database with all migrations applied
pub async fn setup_db() -> DbPool {
    let config = AppConfig::for_testing();
    let db = create_db_pool(&config).await.unwrap();
    run_migrations(&db).await.unwrap();
    db
}

/// Full application router on a fresh database
pub async fn setup_app() -> Router {
    setup_app_with_registry(stub_registry()).await.0
}

/// Router with custom geocoding providers, plus a handle on its database
pub async fn setup_app_with_registry(
    registry: Arc<GeocodingProviderRegistry>,
) -> (Router, DbPool) {
    common::init_test_env();

    let db = setup_db().await;
    let state = AppState::with_registry(db.clone(), AppConfig::for_testing(), registry).unwrap();
    (create_router(state), db)
}
