// src/infrastructure/geocoding/google_maps.rs

use super::{
    build_http_client, FormattableGeocodingResult, GeocodingError, GeocodingProvider,
    GeocodingResponseAdapter,
};
use crate::config::GeocodingConfig;
use crate::utils::geo::{BoundingBox, Coordinates};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

pub const PROVIDER_NAME: &str = "GoogleMaps";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleMapsResponse {
    #[serde(default)]
    pub results: Option<Vec<GoogleMapsResult>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleMapsResult {
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub address_components: Option<Vec<GoogleMapsAddressComponent>>,
    #[serde(default)]
    pub geometry: Option<GoogleMapsGeometry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleMapsAddressComponent {
    #[serde(default)]
    pub long_name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub types: Option<Vec<String>>,
}

impl GoogleMapsAddressComponent {
    fn has_any_type(&self, wanted: &[&str]) -> bool {
        self.types
            .as_ref()
            .is_some_and(|types| types.iter().any(|t| wanted.contains(&t.as_str())))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleMapsGeometry {
    #[serde(default)]
    pub location: Option<GoogleMapsLocation>,
    #[serde(default)]
    pub bounds: Option<GoogleMapsViewport>,
    #[serde(default)]
    pub viewport: Option<GoogleMapsViewport>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleMapsViewport {
    #[serde(default)]
    pub northeast: Option<GoogleMapsLocation>,
    #[serde(default)]
    pub southwest: Option<GoogleMapsLocation>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GoogleMapsLocation {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleMapsResponseAdapter;

impl GeocodingResponseAdapter<GoogleMapsResponse> for GoogleMapsResponseAdapter {
    fn adapt(
        &self,
        response: &GoogleMapsResponse,
        request_point: Coordinates,
        provider_name: &str,
    ) -> Result<FormattableGeocodingResult, GeocodingError> {
        let Some(first) = response.results.as_ref().and_then(|results| results.first()) else {
            warn!(
                lon = request_point.longitude,
                lat = request_point.latitude,
                "Empty or null Google Maps response"
            );
            return Err(GeocodingError::EmptyResponse(
                "Google Maps returned empty or null response".to_string(),
            ));
        };

        let result_coordinates = first
            .geometry
            .as_ref()
            .and_then(|geometry| geometry.location)
            .map_or(request_point, |location| {
                Coordinates::new(location.lng, location.lat)
            });

        let bounding_box = first.geometry.as_ref().and_then(extract_bounding_box);
        let components = first.address_components.as_deref();

        Ok(FormattableGeocodingResult {
            request_coordinates: request_point,
            result_coordinates,
            bounding_box,
            formatted_display_name: format_display_name(first),
            city: components.and_then(extract_city),
            country: components.and_then(extract_country),
            provider_name: provider_name.to_string(),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// "Name (Street)", "Name", the formatted address, or "Unknown location"
fn format_display_name(result: &GoogleMapsResult) -> String {
    let components = result.address_components.as_deref();
    let establishment = components.and_then(extract_establishment_name);
    let street = components.and_then(extract_street_address);

    let is_present = |value: &&str| !value.trim().is_empty();

    match establishment.filter(is_present) {
        Some(name) => match street.as_deref().filter(is_present) {
            Some(street) => format!("{} ({})", name, street),
            None => name.to_string(),
        },
        None => result
            .formatted_address
            .clone()
            .unwrap_or_else(|| "Unknown location".to_string()),
    }
}

fn extract_establishment_name(components: &[GoogleMapsAddressComponent]) -> Option<&str> {
    components
        .iter()
        .find(|c| c.has_any_type(&["establishment", "point_of_interest", "premise"]))
        .and_then(|c| c.long_name.as_deref())
}

fn extract_street_address(components: &[GoogleMapsAddressComponent]) -> Option<String> {
    let mut street_number = None;
    let mut route = None;

    for component in components {
        if component.has_any_type(&["street_number"]) {
            street_number = component.long_name.as_deref();
        } else if component.has_any_type(&["route"]) {
            route = component.long_name.as_deref();
        }
    }

    match (street_number, route) {
        (Some(number), Some(route)) => Some(format!("{} {}", number, route)),
        (None, Some(route)) => Some(route.to_string()),
        (_, None) => None,
    }
}

fn extract_city(components: &[GoogleMapsAddressComponent]) -> Option<String> {
    components
        .iter()
        .find(|c| c.has_any_type(&["locality", "administrative_area_level_2", "sublocality"]))
        .and_then(|c| c.long_name.clone())
}

fn extract_country(components: &[GoogleMapsAddressComponent]) -> Option<String> {
    components
        .iter()
        .find(|c| c.has_any_type(&["country"]))
        .and_then(|c| c.long_name.clone())
}

fn extract_bounding_box(geometry: &GoogleMapsGeometry) -> Option<BoundingBox> {
    let viewport = geometry.bounds.as_ref().or(geometry.viewport.as_ref())?;
    let (ne, sw) = (viewport.northeast?, viewport.southwest?);
    let bbox = BoundingBox::new(sw.lat, ne.lat, sw.lng, ne.lng);
    if bbox.is_none() {
        warn!("Failed to create bounding box from Google Maps viewport");
    }
    bbox
}

/// Google Maps Geocoding API client
pub struct GoogleMapsProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    adapter: GoogleMapsResponseAdapter,
}

impl GoogleMapsProvider {
    pub fn new(config: &GeocodingConfig, api_key: String) -> Result<Self, GeocodingError> {
        Ok(Self {
            client: build_http_client(config.request_timeout, &config.user_agent)?,
            base_url: config.google_maps_url.trim_end_matches('/').to_string(),
            api_key,
            adapter: GoogleMapsResponseAdapter,
        })
    }
}

#[async_trait]
impl GeocodingProvider for GoogleMapsProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn display_name(&self) -> &str {
        "Google Maps"
    }

    async fn reverse_geocode(
        &self,
        point: Coordinates,
    ) -> Result<FormattableGeocodingResult, GeocodingError> {
        let url = format!(
            "{}/maps/api/geocode/json?latlng={},{}&key={}",
            self.base_url,
            point.latitude,
            point.longitude,
            urlencoding::encode(&self.api_key)
        );
        debug!(lat = point.latitude, lon = point.longitude, "Querying Google Maps");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(GeocodingError::Unavailable(format!(
                "Google Maps returned {}",
                response.status()
            )));
        }

        let body: GoogleMapsResponse = response
            .json()
            .await
            .map_err(|e| GeocodingError::Parse(e.to_string()))?;

        match body.status.as_deref() {
            None | Some("OK") | Some("ZERO_RESULTS") => {}
            Some(status) => {
                return Err(GeocodingError::Unavailable(format!(
                    "Google Maps status {}: {}",
                    status,
                    body.error_message.as_deref().unwrap_or("no details")
                )));
            }
        }

        self.adapter.adapt(&body, point, PROVIDER_NAME)
    }
}
