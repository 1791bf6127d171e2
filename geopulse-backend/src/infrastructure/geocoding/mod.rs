// src/infrastructure/geocoding/mod.rs
//! Reverse geocoding providers and the adapters that normalize their payloads.

pub mod google_maps;
pub mod nominatim;
pub mod photon;
pub mod registry;

use crate::utils::geo::{BoundingBox, Coordinates};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

pub use registry::GeocodingProviderRegistry;

#[derive(Error, Debug)]
pub enum GeocodingError {
    #[error("{0}")]
    EmptyResponse(String),

    #[error("Geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Geocoding provider unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to parse geocoding response: {0}")]
    Parse(String),

    #[error("Unknown or disabled geocoding provider: {0}")]
    UnknownProvider(String),

    #[error("No geocoding provider is enabled")]
    NoProviderEnabled,
}

/// Provider-independent reverse geocoding answer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattableGeocodingResult {
    pub request_coordinates: Coordinates,
    pub result_coordinates: Coordinates,
    pub bounding_box: Option<BoundingBox>,
    pub formatted_display_name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub provider_name: String,
}

/// Translates one provider's raw response into a [`FormattableGeocodingResult`].
pub trait GeocodingResponseAdapter<R> {
    fn adapt(
        &self,
        response: &R,
        request_point: Coordinates,
        provider_name: &str,
    ) -> Result<FormattableGeocodingResult, GeocodingError>;

    fn provider_name(&self) -> &'static str;
}

#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Human readable label for the UI
    fn display_name(&self) -> &str {
        self.name()
    }

    async fn reverse_geocode(
        &self,
        point: Coordinates,
    ) -> Result<FormattableGeocodingResult, GeocodingError>;
}

pub(crate) fn build_http_client(
    timeout: Duration,
    user_agent: &str,
) -> Result<reqwest::Client, GeocodingError> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .map_err(GeocodingError::Http)
}

/// Turns a blank string into `None`.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
